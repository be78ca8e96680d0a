//! Server Module
//!
//! - **`state`** - `AppState` and its `FromRef` projections
//! - **`config`** - loading the configured store, mailer and media host
//! - **`init`** - assembling the application router

pub mod state;

pub mod config;

pub mod init;

pub use init::{build_state, create_app};
pub use state::AppState;
