/**
 * OTP Verification Handler
 *
 * `POST /api/v1/auth/verify-otp`
 *
 * Marks the account verified, clears the OTP and opens a session.
 */

use axum::{extract::State, http::StatusCode, response::Response};
use chrono::Utc;

use crate::backend::auth::handlers::session::session_response;
use crate::backend::auth::handlers::types::{normalize_email, VerifyOtpRequest};
use crate::backend::auth::otp;
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;

pub async fn verify_otp(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerifyOtpRequest>,
) -> Result<Response, BackendError> {
    let email = normalize_email(&request.email);
    let user = state.store.user_by_email(&email).await?;

    let mut user = match user {
        Some(user) if user.verified => {
            return Err(BackendError::validation("Email is already verified! Login Instead."));
        }
        Some(user) if user.has_live_otp(Utc::now()) => user,
        _ => return Err(BackendError::validation("The OTP has expired!")),
    };

    let hash = user.otp_hash.take().unwrap_or_default();
    if !otp::matches(&request.otp, &hash)? {
        tracing::warn!("[Auth] Wrong OTP for {}", user.id);
        return Err(BackendError::validation("Incorrect OTP!"));
    }

    user.verified = true;
    user.otp_hash = None;
    user.otp_expires_at = None;
    let user = state.store.save_user(&user).await?;

    tracing::info!("[Auth] Verified {}", user.id);
    session_response(&state, StatusCode::CREATED, "OTP verified successfully!", &user)
}
