//! Backend Module
//!
//! Server-side code for Talks: the Axum HTTP API, the WebSocket presence
//! and messaging layer, and the collaborators they use.
//!
//! # Architecture
//!
//! - **`server`** - application state, service loading, startup
//! - **`routes`** - router assembly, CORS and tracing layers
//! - **`realtime`** - identity check, presence registry, connection gateway,
//!   event router, online-users broadcast
//! - **`messaging`** - conversation/message coordinator and its HTTP routes
//! - **`auth`** - users, JWT sessions, OTP verification, auth routes
//! - **`users`** - profile and directory routes
//! - **`middleware`** - auth guard and JSON extraction
//! - **`store`** - persistence (`Store` trait, Postgres and in-memory)
//! - **`media`** - hosted image uploads
//! - **`mail`** - outbound email
//! - **`error`** - `BackendError` and its HTTP/socket rendering
//!
//! # Request Flow
//!
//! ```text
//! HTTP  → router → [auth_middleware] → handler → coordinator → store
//! WS    → /ws → identity → gateway → event router → coordinator → store
//!                                         ↓
//!                        presence registry → connection table → socket
//! ```

pub mod server;

pub mod routes;

pub mod realtime;

pub mod messaging;

pub mod auth;

pub mod users;

pub mod middleware;

pub mod store;

pub mod media;

pub mod mail;

pub mod error;

pub use error::BackendError;
pub use server::create_app;
