//! Conversation and message models shared by the HTTP and socket surfaces.

pub mod conversation;
pub mod message;

pub use conversation::{pair_key, Conversation};
pub use message::{Message, NewMessage};
