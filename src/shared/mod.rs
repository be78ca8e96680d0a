//! Shared Module
//!
//! Wire-level types used by both the HTTP routes and the socket layer:
//! socket events, conversation and message models, configuration, and the
//! errors raised while decoding or validating them.

pub mod event;

pub mod error;

pub mod config;

pub mod messaging;

pub use event::{ClientEvent, PresenceStatus, ServerEvent};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use messaging::{Conversation, Message, NewMessage};
