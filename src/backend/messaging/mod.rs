//! Messaging Module
//!
//! - **`coordinator`** - conversation and message rules shared by HTTP and sockets
//! - **`handlers`** - the `/conversation` and `/message` routes

pub mod coordinator;

pub mod handlers;

pub use coordinator::{ConversationCoordinator, OutgoingMessage};
pub use handlers::{list_conversations, send_message, start_conversation};
