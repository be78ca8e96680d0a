//! Common test utilities
//!
//! - App fixtures with an in-memory store, a recording mailer and a fake
//!   media host
//! - Request builders and response/event assertions

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
