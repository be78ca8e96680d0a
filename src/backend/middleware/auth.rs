/**
 * Authentication Middleware
 *
 * Protects every route except the auth routes. The credential is read from
 * the `jwt` cookie first, then from `Authorization: Bearer <token>`.
 *
 * A request is rejected with 401 when:
 * - no credential is present
 * - the token is invalid or expired
 * - the user it names no longer exists
 * - the token was issued before the user's last password change
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::SESSION_COOKIE;
use crate::backend::error::BackendError;
use crate::backend::realtime::identity::{bearer_token, cookie_value};
use crate::backend::server::state::AppState;

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let headers = request.headers();
    let token = cookie_value(headers, SESSION_COOKIE).or_else(|| bearer_token(headers));

    let claims = state.identity.claims(token.as_deref())?;
    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("[Auth] Token subject is not a user id: {}", claims.sub);
        BackendError::unauthorized("Invalid or expired token. Please log in again.")
    })?;

    let user = state.store.user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!("[Auth] Token for deleted user {}", user_id);
        BackendError::unauthorized("The user belonging to this token no longer exists.")
    })?;

    if user.changed_password_after(claims.iat_ms) {
        tracing::info!("[Auth] Stale token for {} after password change", user_id);
        return Err(BackendError::unauthorized(
            "User recently changed password! Please log in again.",
        ));
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: user.email,
    });

    Ok(next.run(request).await)
}

/// Extractor for handlers behind `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<AuthenticatedUser>().cloned().ok_or_else(|| {
            tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
            BackendError::unauthorized("You are not logged in! Please log in to get access.")
        })?;

        Ok(AuthUser(user))
    }
}
