/**
 * Authentication Handler Types
 *
 * Request and response bodies for the `/auth` routes. Requests are
 * validated here, before any storage access.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::UserProfile;
use crate::shared::SharedError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SignupRequest {
    pub firstname: String,
    #[serde(default)]
    pub lastname: Option<String>,
    pub email: String,
    /// Plain text, hashed before storage
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.firstname.trim().is_empty() {
            return Err(SharedError::validation("firstname", "Please provide your first name."));
        }
        validate_email(&self.email)?;
        validate_password("password", &self.password)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ResendOtpRequest {
    pub email: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(SharedError::validation(
                "email",
                "Please provide email and password!",
            ));
        }
        Ok(())
    }
}

/// Returned whenever a session is issued (verify-otp, login, password change)
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub status: &'static str,
    pub message: String,
    /// JWT, also set as the `jwt` cookie
    pub token: String,
    pub user: UserProfile,
}

/// Plain `{status, message}` success body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Emails are compared and stored lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(SharedError::validation("email", "Please provide a valid email address."))
    }
}

pub fn validate_password(field: &str, password: &str) -> Result<(), SharedError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            field,
            format!("Password must be at least {} characters long.", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}
