/**
 * Router Configuration
 *
 * - `GET /ws` - socket upgrade
 * - `/api/v1/...` - JSON API
 * - fallback - 404 in the uniform error shape
 *
 * CORS allows the configured frontend origin with credentials; without
 * one every origin is mirrored back.
 */

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::realtime::handle_socket_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

pub fn create_router(app_state: AppState) -> Router<()> {
    let cors = cors_layer(app_state.config.frontend_url.as_deref());

    Router::new()
        .route("/ws", get(handle_socket_upgrade))
        .nest(API_PREFIX, configure_api_routes(app_state.clone()))
        .fallback(|| async { BackendError::not_found("Route not found on this server.") })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => origin,
        Some(Err(e)) => {
            tracing::error!("FRONTEND_URL is not a valid origin: {}", e);
            return CorsLayer::very_permissive();
        }
        None => return CorsLayer::very_permissive(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
