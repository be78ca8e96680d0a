/**
 * User Handlers
 *
 * Profile routes for the authenticated user and the directory of other
 * verified users. All of them sit behind `auth_middleware`.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;

use crate::backend::auth::handlers::session::session_response;
use crate::backend::auth::handlers::types::validate_password;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::users::types::{
    ProfileResponse, UpdateAvatarRequest, UpdatePasswordRequest, UpdateProfileRequest,
    UserListResponse,
};
use crate::shared::messaging::message::non_blank;

async fn current_user(state: &AppState, auth: &AuthUser) -> Result<User, BackendError> {
    state
        .store
        .user_by_id(auth.0.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found."))
}

fn profile_response(user: &User, message: Option<&str>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        status: "success",
        message: message.map(str::to_string),
        user: user.profile(),
    })
}

/// `GET /api/v1/user/me`
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, BackendError> {
    let user = current_user(&state, &auth).await?;
    Ok(profile_response(&user, None))
}

/// `PATCH /api/v1/user/me`
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, BackendError> {
    let mut user = current_user(&state, &auth).await?;

    if let Some(firstname) = request.firstname {
        let firstname = firstname.trim();
        if firstname.is_empty() {
            return Err(BackendError::validation("Please provide your first name."));
        }
        user.firstname = firstname.to_string();
    }
    if request.lastname.is_some() {
        user.lastname = non_blank(request.lastname);
    }
    if request.job_title.is_some() {
        user.job_title = non_blank(request.job_title);
    }
    if request.bio.is_some() {
        user.bio = non_blank(request.bio);
    }
    if request.country.is_some() {
        user.country = non_blank(request.country);
    }

    let user = state.store.save_user(&user).await?;
    tracing::info!("[Users] Profile updated for {}", user.id);
    Ok(profile_response(&user, Some("Profile updated successfully!")))
}

/// `PATCH /api/v1/user/avatar`
pub async fn update_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<UpdateAvatarRequest>,
) -> Result<Json<ProfileResponse>, BackendError> {
    if request.avatar.trim().is_empty() {
        return Err(BackendError::validation("Please provide an avatar."));
    }
    let mut user = current_user(&state, &auth).await?;

    let url = state.media.upload(&request.avatar).await?;
    user.avatar = Some(url);

    let user = state.store.save_user(&user).await?;
    tracing::info!("[Users] Avatar updated for {}", user.id);
    Ok(profile_response(&user, Some("Avatar updated successfully!")))
}

/// `PATCH /api/v1/user/password`
///
/// Tokens issued before the change stop working; the response carries a
/// fresh session.
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<UpdatePasswordRequest>,
) -> Result<Response, BackendError> {
    validate_password("newPassword", &request.new_password)?;
    let mut user = current_user(&state, &auth).await?;

    if !bcrypt::verify(&request.current_password, &user.password_hash)? {
        tracing::warn!("[Users] Wrong current password for {}", user.id);
        return Err(BackendError::validation("Incorrect Password!"));
    }

    user.password_hash = bcrypt::hash(&request.new_password, state.config.bcrypt_cost)?;
    user.password_changed_at = Some(Utc::now());
    let user = state.store.save_user(&user).await?;

    tracing::info!("[Users] Password changed for {}", user.id);
    session_response(&state, StatusCode::OK, "Password updated successfully!", &user)
}

/// `GET /api/v1/user/all`
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserListResponse>, BackendError> {
    let users: Vec<_> = state
        .store
        .verified_users_except(auth.0.user_id)
        .await?
        .iter()
        .map(User::summary)
        .collect();

    Ok(Json(UserListResponse {
        status: "success",
        results: users.len(),
        users,
    }))
}
