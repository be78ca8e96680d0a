use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::backend::auth::users::{NewUser, User};
use crate::backend::realtime::connection::ConnectionId;
use crate::shared::messaging::pair_key;
use crate::shared::{Conversation, Message, NewMessage, PresenceStatus};

/// Process-local store. One mutex guards all tables, which makes
/// find-or-create and append atomic.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
    writes: AtomicUsize,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    conversations: HashMap<Uuid, Conversation>,
    pairs: HashMap<(Uuid, Uuid), Uuid>,
    messages: HashMap<Uuid, Message>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutating operations applied so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.inner.lock();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email".to_string()));
        }
        let user = user.into_user(Uuid::new_v4(), Utc::now());
        tables.users.insert(user.id, user.clone());
        self.wrote();
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        if self.inner.lock().users.remove(&id).is_some() {
            self.wrote();
        }
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.lock().users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn save_user(&self, user: &User) -> StoreResult<User> {
        let mut tables = self.inner.lock();
        let stored = tables.users.get_mut(&user.id).ok_or(StoreError::Missing("User"))?;

        stored.firstname = user.firstname.clone();
        stored.lastname = user.lastname.clone();
        stored.password_hash = user.password_hash.clone();
        stored.avatar = user.avatar.clone();
        stored.job_title = user.job_title.clone();
        stored.bio = user.bio.clone();
        stored.country = user.country.clone();
        stored.verified = user.verified;
        stored.otp_hash = user.otp_hash.clone();
        stored.otp_expires_at = user.otp_expires_at;
        stored.password_changed_at = user.password_changed_at;
        stored.updated_at = Utc::now();

        let saved = stored.clone();
        self.wrote();
        Ok(saved)
    }

    async fn verified_users_except(&self, id: Uuid) -> StoreResult<Vec<User>> {
        let tables = self.inner.lock();
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.verified && u.id != id)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn mark_online(&self, user_id: Uuid, connection: ConnectionId) -> StoreResult<Option<User>> {
        let mut tables = self.inner.lock();
        let Some(user) = tables.users.get_mut(&user_id) else {
            return Ok(None);
        };
        user.connection_id = Some(connection.as_uuid());
        user.status = PresenceStatus::Online.as_str().to_string();
        user.updated_at = Utc::now();
        let user = user.clone();
        self.wrote();
        Ok(Some(user))
    }

    async fn mark_offline(&self, connection: ConnectionId) -> StoreResult<Option<User>> {
        let mut tables = self.inner.lock();
        let Some(user) = tables
            .users
            .values_mut()
            .find(|u| u.connection_id == Some(connection.as_uuid()))
        else {
            return Ok(None);
        };
        user.connection_id = None;
        user.status = PresenceStatus::Offline.as_str().to_string();
        user.updated_at = Utc::now();
        let user = user.clone();
        self.wrote();
        Ok(Some(user))
    }

    async fn conversation_between(&self, a: Uuid, b: Uuid) -> StoreResult<Option<Conversation>> {
        let tables = self.inner.lock();
        Ok(tables
            .pairs
            .get(&pair_key(a, b))
            .and_then(|id| tables.conversations.get(id))
            .cloned())
    }

    async fn find_or_create_conversation(&self, a: Uuid, b: Uuid) -> StoreResult<(Conversation, bool)> {
        let mut tables = self.inner.lock();
        if let Some(existing) = tables
            .pairs
            .get(&pair_key(a, b))
            .and_then(|id| tables.conversations.get(id))
        {
            return Ok((existing.clone(), false));
        }

        let conversation = Conversation::new(a, b);
        tables.pairs.insert(pair_key(a, b), conversation.id);
        tables.conversations.insert(conversation.id, conversation.clone());
        self.wrote();
        Ok((conversation, true))
    }

    async fn conversation(&self, id: Uuid) -> StoreResult<Option<Conversation>> {
        Ok(self.inner.lock().conversations.get(&id).cloned())
    }

    async fn conversations_for(&self, user: Uuid) -> StoreResult<Vec<Conversation>> {
        let tables = self.inner.lock();
        let mut conversations: Vec<Conversation> = tables
            .conversations
            .values()
            .filter(|c| c.involves(user))
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }

    async fn append_message(&self, conversation_id: Uuid, message: NewMessage) -> StoreResult<Message> {
        let mut tables = self.inner.lock();
        let preview = message.preview();
        let now = Utc::now();

        let conversation = tables
            .conversations
            .get_mut(&conversation_id)
            .ok_or(StoreError::Missing("Conversation"))?;
        let message = message.into_message(Uuid::new_v4(), now);
        conversation.messages.push(message.id);
        conversation.last_message = Some(preview);
        conversation.updated_at = now;

        tables.messages.insert(message.id, message.clone());
        self.wrote();
        Ok(message)
    }

    async fn conversation_messages(&self, id: Uuid) -> StoreResult<Option<Vec<Message>>> {
        let tables = self.inner.lock();
        Ok(tables.conversations.get(&id).map(|conversation| {
            conversation
                .messages
                .iter()
                .filter_map(|message_id| tables.messages.get(message_id).cloned())
                .collect()
        }))
    }
}
