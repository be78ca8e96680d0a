/**
 * One-Time Passwords
 *
 * Four-digit codes mailed at signup. Only the bcrypt hash is stored, with
 * an expiry two minutes out.
 */

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const OTP_TTL_SECS: i64 = 120;

/// A freshly generated code and what gets stored for it
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    /// Plain code, mailed to the user and never stored
    pub code: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

pub fn generate_code() -> String {
    rand::rng().random_range(1000..=9999).to_string()
}

pub fn issue(cost: u32) -> Result<OtpChallenge, bcrypt::BcryptError> {
    let code = generate_code();
    let hash = bcrypt::hash(&code, cost)?;
    Ok(OtpChallenge {
        code,
        hash,
        expires_at: Utc::now() + Duration::seconds(OTP_TTL_SECS),
    })
}

pub fn matches(code: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(code.trim(), hash)
}
