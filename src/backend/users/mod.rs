//! User Module
//!
//! Profile and directory routes under `/api/v1/user`.

pub mod types;

pub mod handlers;

pub use handlers::{get_me, list_users, update_avatar, update_me, update_password};
