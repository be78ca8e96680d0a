//! Persistence
//!
//! Everything the backend stores goes through the [`Store`] trait so the
//! real-time core and the HTTP handlers can run against PostgreSQL in
//! production and against [`memory::InMemoryStore`] in tests or when no
//! `DATABASE_URL` is configured.
//!
//! Two operations carry atomicity guarantees that the rest of the backend
//! relies on:
//!
//! - [`Store::find_or_create_conversation`] yields at most one conversation
//!   per unordered participant pair, even under concurrent calls.
//! - [`Store::append_message`] creates the message, appends it to the
//!   conversation and updates the preview as one unit.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::realtime::connection::ConnectionId;
use crate::shared::{Conversation, Message, NewMessage};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A uniqueness rule was violated
    #[error("duplicate {0}")]
    Conflict(String),

    #[error("{0} not found")]
    Missing(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Insert an unverified user. Fails with `Conflict` on a taken email.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn delete_user(&self, id: Uuid) -> StoreResult<()>;

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Persist profile, credential and verification fields of `user`.
    /// Presence fields are left alone.
    async fn save_user(&self, user: &User) -> StoreResult<User>;

    /// Verified users other than `id`
    async fn verified_users_except(&self, id: Uuid) -> StoreResult<Vec<User>>;

    /// Set the user `Online` on `connection`. `None` if the user is gone.
    async fn mark_online(&self, user_id: Uuid, connection: ConnectionId) -> StoreResult<Option<User>>;

    /// Find the user holding `connection`, clear it and set `Offline`.
    /// `None` (and no write) if no user holds it.
    async fn mark_offline(&self, connection: ConnectionId) -> StoreResult<Option<User>>;

    async fn conversation_between(&self, a: Uuid, b: Uuid) -> StoreResult<Option<Conversation>>;

    /// Existing conversation for the unordered pair, or a new one.
    /// The flag is `true` when this call created it.
    async fn find_or_create_conversation(&self, a: Uuid, b: Uuid) -> StoreResult<(Conversation, bool)>;

    async fn conversation(&self, id: Uuid) -> StoreResult<Option<Conversation>>;

    /// Conversations `user` takes part in, most recently updated first
    async fn conversations_for(&self, user: Uuid) -> StoreResult<Vec<Conversation>>;

    async fn append_message(&self, conversation_id: Uuid, message: NewMessage) -> StoreResult<Message>;

    /// Messages of a conversation in insertion order, `None` if it does not exist
    async fn conversation_messages(&self, id: Uuid) -> StoreResult<Option<Vec<Message>>>;
}
