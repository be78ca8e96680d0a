//! Talks - Chat Backend
//!
//! The server side of a one-to-one chat application: account signup with
//! emailed one-time passwords, JWT sessions, user profiles, conversations
//! and messages over a JSON API, and a WebSocket layer that tracks who is
//! online and pushes messages and typing indicators as they happen.
//!
//! # Module Structure
//!
//! - **`shared`** - wire types: socket events, messages, conversations,
//!   configuration and shared errors
//! - **`backend`** - the Axum server, realtime layer, storage and
//!   collaborators
//!
//! # Usage
//!
//! ```rust,no_run
//! use talks::backend::server::init::create_app;
//! use talks::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod shared;

pub mod backend;
