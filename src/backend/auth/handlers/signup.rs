/**
 * Signup Handler
 *
 * `POST /api/v1/auth/signup`
 *
 * 1. Validate the body
 * 2. Reject a verified account with the same email; replace an unverified one
 * 3. Hash the password and a fresh OTP
 * 4. Create the unverified user
 * 5. Mail the OTP
 */

use axum::{extract::State, http::StatusCode, Json};

use crate::backend::auth::handlers::types::{normalize_email, SignupRequest, StatusResponse};
use crate::backend::auth::otp;
use crate::backend::auth::users::NewUser;
use crate::backend::error::BackendError;
use crate::backend::mail::template::otp_mail;
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;
use crate::shared::messaging::message::non_blank;

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), BackendError> {
    request.validate()?;
    let email = normalize_email(&request.email);
    tracing::info!("[Auth] Signup request for {}", email);

    if let Some(existing) = state.store.user_by_email(&email).await? {
        if existing.verified {
            tracing::warn!("[Auth] Signup for existing account {}", email);
            return Err(BackendError::validation("Account already exists! Login Instead."));
        }
        tracing::debug!("[Auth] Replacing unverified account {}", existing.id);
        state.store.delete_user(existing.id).await?;
    }

    let cost = state.config.bcrypt_cost;
    let password_hash = bcrypt::hash(&request.password, cost)?;
    let challenge = otp::issue(cost)?;

    let user = state
        .store
        .create_user(NewUser {
            firstname: request.firstname.trim().to_string(),
            lastname: non_blank(request.lastname),
            email,
            password_hash,
            otp_hash: challenge.hash,
            otp_expires_at: challenge.expires_at,
        })
        .await?;

    state
        .mailer
        .send(otp_mail(&user.email, &user.firstname, &challenge.code))
        .await?;

    tracing::info!("[Auth] Created unverified user {}", user.id);
    Ok((
        StatusCode::CREATED,
        Json(StatusResponse::success("OTP sent to email!")),
    ))
}
