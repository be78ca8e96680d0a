/**
 * Talks Server Entry Point
 *
 * Loads `.env`, initialises tracing, reads `AppConfig` and serves the app.
 */

use talks::backend::server::init::create_app;
use talks::shared::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    tracing::info!("[Startup] Server initialization started");

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("[Startup] Invalid configuration: {}", e);
        e
    })?;
    let port = config.server_port;

    let app = create_app(config).await.map_err(|e| {
        tracing::error!("[Startup] Could not open the store: {}", e);
        e
    })?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Startup] Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
