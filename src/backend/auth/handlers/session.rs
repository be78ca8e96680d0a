//! Issuing a session: token in the body and in the `jwt` cookie.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::auth::handlers::types::AuthResponse;
use crate::backend::auth::sessions::session_cookie;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub fn session_response(
    state: &AppState,
    status: StatusCode,
    message: &str,
    user: &User,
) -> Result<Response, BackendError> {
    let token = state.sessions.issue(user.id)?;
    let cookie = session_cookie(&token, !state.config.is_development());

    let body = AuthResponse {
        status: "success",
        message: message.to_string(),
        token,
        user: user.profile(),
    };

    Ok((status, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}
