//! Authentication Module
//!
//! - **`users`** - user record and its public projections
//! - **`sessions`** - JWT issuing/verification and the session cookie
//! - **`otp`** - one-time passwords for email verification
//! - **`handlers`** - the `/auth` HTTP routes

pub mod users;

pub mod sessions;

pub mod otp;

pub mod handlers;

pub use sessions::{Claims, SessionKeys};
pub use users::{NewUser, User, UserProfile, UserSummary};
