/**
 * Session Management and JWT Tokens
 *
 * Tokens are HS256 JWTs carrying the user id, valid for seven days. The
 * same token is handed out in the response body and as the `jwt` cookie.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime, also used as the cookie `Max-Age`
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

pub const SESSION_COOKIE: &str = "jwt";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issue time in Unix milliseconds, checked against password changes
    pub iat_ms: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Signing and verification keys derived from `JWT_SECRET`
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create a JWT token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let issued = Utc::now();
        let now = issued.timestamp().max(0) as u64;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            iat_ms: issued.timestamp_millis(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}

/// `Set-Cookie` value carrying a fresh session
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Strict",
        SESSION_COOKIE, token, TOKEN_TTL_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Strict", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
