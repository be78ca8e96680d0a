/**
 * Login Handler
 *
 * `POST /api/v1/auth/login`
 *
 * Only verified accounts can log in. On success the session token is
 * returned in the body and set as the `jwt` cookie.
 */

use axum::{extract::State, http::StatusCode, response::Response};

use crate::backend::auth::handlers::session::session_response;
use crate::backend::auth::handlers::types::{normalize_email, LoginRequest};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, BackendError> {
    request.validate()?;
    let email = normalize_email(&request.email);
    tracing::info!("[Auth] Login request for {}", email);

    let user = state
        .store
        .user_by_email(&email)
        .await?
        .filter(|user| user.verified)
        .ok_or_else(|| {
            tracing::warn!("[Auth] No verified account for {}", email);
            BackendError::validation("User not found! Signup Instead.")
        })?;

    if !bcrypt::verify(&request.password, &user.password_hash)? {
        tracing::warn!("[Auth] Wrong password for {}", user.id);
        return Err(BackendError::validation("Incorrect Password!"));
    }

    session_response(&state, StatusCode::OK, "Logged in successfully!", &user)
}
