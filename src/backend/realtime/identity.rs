/**
 * Identity Verifier
 *
 * Turns the credential presented with a request or socket handshake into a
 * user id. Pure: no storage access, no side effects.
 *
 * Credential sources, first match wins:
 * 1. handshake auth data (`?token=` or `?jwt=` on the upgrade request)
 * 2. `Authorization: Bearer <token>`
 * 3. the `jwt` cookie
 */

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::backend::auth::sessions::{Claims, SessionKeys, SESSION_COOKIE};
use crate::backend::error::BackendError;

#[derive(Clone)]
pub struct IdentityVerifier {
    keys: Arc<SessionKeys>,
}

impl IdentityVerifier {
    pub fn new(keys: Arc<SessionKeys>) -> Self {
        Self { keys }
    }

    /// Validate a credential and return its claims
    pub fn claims(&self, credential: Option<&str>) -> Result<Claims, BackendError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                BackendError::unauthorized("You are not logged in! Please log in to get access.")
            })?;

        self.keys.verify(token).map_err(|e| {
            tracing::warn!("[Identity] Rejected token: {}", e);
            BackendError::unauthorized("Invalid or expired token. Please log in again.")
        })
    }

    /// Validate a credential and return the user id it names
    pub fn verify(&self, credential: Option<&str>) -> Result<Uuid, BackendError> {
        let claims = self.claims(credential)?;
        claims.user_id().ok_or_else(|| {
            tracing::warn!("[Identity] Token subject is not a user id: {}", claims.sub);
            BackendError::unauthorized("Invalid or expired token. Please log in again.")
        })
    }
}

/// Pick the credential out of a handshake
pub fn handshake_credential(auth: Option<String>, headers: &HeaderMap) -> Option<String> {
    auth.filter(|t| !t.trim().is_empty())
        .or_else(|| bearer_token(headers))
        .or_else(|| cookie_value(headers, SESSION_COOKIE))
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}
