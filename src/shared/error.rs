//! Shared Error Types
//!
//! Errors raised by the wire-level types in `shared`: decoding client frames
//! and validating request payloads before they reach the backend.
//!
//! # Usage
//!
//! ```rust
//! use talks::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Please provide a valid email address.");
//! assert_eq!(error.reason(), "Please provide a valid email address.");
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// A frame or body could not be decoded
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        message: String,
    },

    /// A decoded payload failed a field check
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        field: String,
        message: String,
    },
}

impl SharedError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The human-facing part of the error, without the field prefix
    pub fn reason(&self) -> &str {
        match self {
            Self::MalformedPayload { message } => message,
            Self::ValidationError { message, .. } => message,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload {
            message: err.to_string(),
        }
    }
}
