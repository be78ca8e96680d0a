/**
 * User Model
 *
 * The stored user record plus the shapes used to create one and to expose
 * one over HTTP. Persistence lives behind `backend::store::Store`.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::shared::PresenceStatus;

/// User struct representing a user in the database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: Option<String>,
    /// Unique, stored lowercase
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub avatar: Option<String>,
    pub job_title: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub verified: bool,
    /// Hashed one-time password (bcrypt)
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub password_changed_at: Option<DateTime<Utc>>,
    /// `Online` or `Offline`
    pub status: String,
    /// Live socket connection, if any
    pub connection_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create an unverified account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub otp_hash: String,
    pub otp_expires_at: DateTime<Utc>,
}

impl NewUser {
    pub fn into_user(self, id: Uuid, now: DateTime<Utc>) -> User {
        User {
            id,
            firstname: self.firstname,
            lastname: self.lastname,
            email: self.email,
            password_hash: self.password_hash,
            avatar: None,
            job_title: None,
            bio: None,
            country: None,
            verified: false,
            otp_hash: Some(self.otp_hash),
            otp_expires_at: Some(self.otp_expires_at),
            password_changed_at: None,
            status: PresenceStatus::Offline.as_str().to_string(),
            connection_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl User {
    /// "First Last", or just the first name
    pub fn display_name(&self) -> String {
        match self.lastname.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            Some(last) => format!("{} {}", self.firstname, last),
            None => self.firstname.clone(),
        }
    }

    pub fn presence(&self) -> PresenceStatus {
        PresenceStatus::parse(&self.status)
    }

    /// True if the password changed after a token issued at `issued_at_ms`
    /// (Unix milliseconds)
    pub fn changed_password_after(&self, issued_at_ms: i64) -> bool {
        match self.password_changed_at {
            Some(changed) => changed.timestamp_millis() > issued_at_ms,
            None => false,
        }
    }

    /// True while an unexpired OTP is pending
    pub fn has_live_otp(&self, now: DateTime<Utc>) -> bool {
        match (&self.otp_hash, self.otp_expires_at) {
            (Some(_), Some(expires)) => expires > now,
            _ => false,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            job_title: self.job_title.clone(),
            bio: self.bio.clone(),
            country: self.country.clone(),
            verified: self.verified,
            status: self.presence(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            avatar: self.avatar.clone(),
            status: self.presence(),
        }
    }
}

/// A user's own profile, as returned by `/user/me` and the auth routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
    pub job_title: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub verified: bool,
    pub status: PresenceStatus,
}

/// Directory entry for another user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: Option<String>,
    pub avatar: Option<String>,
    pub status: PresenceStatus,
}
