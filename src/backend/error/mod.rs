//! Backend Error Module
//!
//! - **`types`** - `BackendError` and its status mapping
//! - **`conversion`** - rendering as an HTTP response or a socket `error` event
//!
//! Handlers return `Result<_, BackendError>` and let `IntoResponse` produce
//! the uniform `{status, message}` body. The socket loop turns the same
//! error into an `error` event for the originating connection only.

pub mod types;

pub mod conversion;

pub use types::BackendError;
