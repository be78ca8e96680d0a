//! Test suite for Talks
//!
//! Integration tests drive the app through its public surface: the HTTP
//! router via `oneshot` and the realtime gateway via in-process sessions.

pub mod common;
pub mod property;
