use axum::{extract::State, http::StatusCode, Json};

use crate::backend::auth::handlers::types::{normalize_email, ResendOtpRequest, StatusResponse};
use crate::backend::auth::otp;
use crate::backend::error::BackendError;
use crate::backend::mail::template::otp_mail;
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;

/// `POST /api/v1/auth/resend-otp`: replace the pending OTP and mail it again
pub async fn resend_otp(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResendOtpRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), BackendError> {
    let email = normalize_email(&request.email);
    let mut user = state
        .store
        .user_by_email(&email)
        .await?
        .ok_or_else(|| BackendError::validation("Email is invalid! Signup Instead."))?;

    if user.verified {
        return Err(BackendError::validation("Email is already verified! Login Instead."));
    }

    let challenge = otp::issue(state.config.bcrypt_cost)?;
    user.otp_hash = Some(challenge.hash);
    user.otp_expires_at = Some(challenge.expires_at);
    let user = state.store.save_user(&user).await?;

    state
        .mailer
        .send(otp_mail(&user.email, &user.firstname, &challenge.code))
        .await?;

    tracing::info!("[Auth] Resent OTP to {}", user.id);
    Ok((StatusCode::OK, Json(StatusResponse::success("OTP sent to email!"))))
}
