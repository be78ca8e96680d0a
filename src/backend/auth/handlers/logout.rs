use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::auth::handlers::types::StatusResponse;
use crate::backend::auth::sessions::clear_session_cookie;
use crate::backend::server::state::AppState;

/// `POST /api/v1/auth/logout`: expire the session cookie
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = clear_session_cookie(!state.config.is_development());
    (
        [(header::SET_COOKIE, cookie)],
        Json(StatusResponse::success("Logged out successfully!")),
    )
        .into_response()
}
