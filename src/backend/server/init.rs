/**
 * Server Initialization
 *
 * 1. Load the store, mailer and media host
 * 2. Build `AppState`
 * 3. Start the periodic presence broadcast
 * 4. Build the router
 */

use axum::Router;

use crate::backend::realtime::spawn_presence_broadcast;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_mailer, load_media, load_store};
use crate::backend::server::state::AppState;
use crate::backend::store::StoreResult;
use crate::shared::AppConfig;

pub async fn build_state(config: AppConfig) -> StoreResult<AppState> {
    let store = load_store(&config).await?;
    let mailer = load_mailer(&config);
    let media = load_media(&config);
    Ok(AppState::new(config, store, mailer, media))
}

pub async fn create_app(config: AppConfig) -> StoreResult<Router<()>> {
    tracing::info!("Initializing Talks backend server");

    let state = build_state(config).await?;

    spawn_presence_broadcast(
        state.presence.clone(),
        state.connections.clone(),
        state.config.presence_interval,
    );
    tracing::info!(
        "Online users broadcast every {:?}",
        state.config.presence_interval
    );

    Ok(create_router(state))
}
