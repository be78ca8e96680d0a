//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - credential check for protected routes
//! - **`json`** - JSON body extractor with uniform rejections

pub mod auth;

pub mod json;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
pub use json::ApiJson;
