/**
 * Backend Error Types
 *
 * One error type for every failure the backend can surface, on either the
 * HTTP path or the socket path.
 *
 * # Error Categories
 *
 * - `Unauthorized` - missing, malformed, expired or revoked credential
 * - `NotFound` - user or conversation does not exist
 * - `ValidationFailed` - request is missing fields or has bad values
 * - `MediaUploadFailed` / `MailDeliveryFailed` - collaborator failures
 * - `Storage` - the store rejected or failed an operation
 * - `Token` / `Internal` - server-side faults
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;
use crate::backend::store::StoreError;
use crate::backend::media::MediaError;
use crate::backend::mail::MailError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use talks::backend::error::BackendError;
///
/// let err = BackendError::unauthorized("You are not logged in! Please log in to get access.");
/// assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("Not found: {message}")]
    NotFound {
        message: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed {
        message: String,
    },

    #[error("Media upload failed: {0}")]
    MediaUploadFailed(#[from] MediaError),

    #[error("Mail delivery failed: {0}")]
    MailDeliveryFailed(#[from] MailError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Token could not be issued
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },

    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Unauthorized` - 401
    /// - `NotFound` - 404
    /// - `ValidationFailed`, validation `SharedError`, store conflicts - 400
    /// - `MediaUploadFailed`, `MailDeliveryFailed` - 502
    /// - everything else - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::MediaUploadFailed(_) | Self::MailDeliveryFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(err) => match err {
                StoreError::Conflict(_) => StatusCode::BAD_REQUEST,
                StoreError::Missing(_) => StatusCode::NOT_FOUND,
                StoreError::Database(_) | StoreError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Token(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Server faults hide their details.
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized { message }
            | Self::NotFound { message }
            | Self::ValidationFailed { message } => message.clone(),
            Self::MediaUploadFailed(_) => "Failed to upload media.".to_string(),
            Self::MailDeliveryFailed(_) => {
                "There was an error sending the email. Try again later!".to_string()
            }
            Self::Storage(StoreError::Conflict(what)) => format!("Duplicate {}.", what),
            Self::Storage(StoreError::Missing(what)) => format!("{} not found.", what),
            Self::SharedError(err) => err.reason().to_string(),
            Self::Storage(_)
            | Self::Token(_)
            | Self::Internal { .. }
            | Self::SerializationError(_) => "Something went wrong!".to_string(),
        }
    }

    /// `"fail"` for client errors, `"error"` for server errors
    pub fn status_label(&self) -> &'static str {
        if self.status_code().is_client_error() {
            "fail"
        } else {
            "error"
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for BackendError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal(format!("hashing failed: {}", err))
    }
}
