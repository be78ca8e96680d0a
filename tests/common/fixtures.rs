//! App fixtures

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use talks::backend::auth::users::{NewUser, User};
use talks::backend::mail::{MailError, Mailer, OutgoingMail};
use talks::backend::media::{MediaError, MediaHost};
use talks::backend::realtime::connection::ConnectionId;
use talks::backend::routes::create_router;
use talks::backend::server::state::AppState;
use talks::backend::store::{InMemoryStore, Store, StoreError, StoreResult};
use talks::shared::{AppConfig, Conversation, Message, NewMessage};
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "password123";

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .jwt_secret("integration-test-secret")
        .bcrypt_cost(4)
        .build()
        .expect("test config")
}

/// Keeps every mail instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().clone()
    }

    /// The code in the latest OTP mail to `to`
    pub fn last_otp_for(&self, to: &str) -> Option<String> {
        let sent = self.sent.lock();
        let mail = sent.iter().rev().find(|m| m.to == to)?;
        let (_, rest) = mail.html.split_once("letter-spacing: 6px;\">")?;
        let (code, _) = rest.split_once("</h2>")?;
        Some(code.trim().to_string())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().push(mail);
        Ok(())
    }
}

/// Accepts any payload and hands back a numbered URL
#[derive(Default)]
pub struct FakeMedia {
    uploads: AtomicUsize,
}

impl FakeMedia {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaHost for FakeMedia {
    async fn upload(&self, _payload: &str) -> Result<String, MediaError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("https://media.test/{}.png", n))
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub media: Arc<FakeMedia>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::wrapping(|store| store as Arc<dyn Store>)
    }

    /// App whose services see `wrap(store)` while `self.store` stays the
    /// plain in-memory store underneath
    pub fn wrapping(wrap: impl FnOnce(Arc<InMemoryStore>) -> Arc<dyn Store>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let media = Arc::new(FakeMedia::default());
        let state = AppState::new(test_config(), wrap(store.clone()), mailer.clone(), media.clone());
        Self {
            state,
            store,
            mailer,
            media,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// A verified user with `TEST_PASSWORD`, plus a session token for them
    pub async fn verified_user(&self, firstname: &str, email: &str) -> (User, String) {
        let mut user = self.unverified_user(firstname, email).await;
        user.verified = true;
        user.otp_hash = None;
        user.otp_expires_at = None;
        let user = self.store.save_user(&user).await.expect("save user");
        let token = self.state.sessions.issue(user.id).expect("issue token");
        (user, token)
    }

    pub async fn unverified_user(&self, firstname: &str, email: &str) -> User {
        self.store
            .create_user(NewUser {
                firstname: firstname.to_string(),
                lastname: None,
                email: email.to_string(),
                password_hash: bcrypt::hash(TEST_PASSWORD, 4).expect("hash"),
                otp_hash: bcrypt::hash("1234", 4).expect("hash"),
                otp_expires_at: Utc::now() + Duration::minutes(2),
            })
            .await
            .expect("create user")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory store with scripted presence behaviour
pub struct ScriptedStore {
    inner: Arc<InMemoryStore>,
    /// Applied to the reply of the first `mark_online`, after its write
    first_online_delay: Option<StdDuration>,
    online_calls: AtomicUsize,
    fail_mark_offline: AtomicBool,
}

impl ScriptedStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            first_online_delay: None,
            online_calls: AtomicUsize::new(0),
            fail_mark_offline: AtomicBool::new(false),
        }
    }

    pub fn delay_first_online(mut self, delay: StdDuration) -> Self {
        self.first_online_delay = Some(delay);
        self
    }

    pub fn failing_mark_offline(self) -> Self {
        self.fail_mark_offline.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl Store for ScriptedStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        self.inner.create_user(user).await
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_user(id).await
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.inner.user_by_id(id).await
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.inner.user_by_email(email).await
    }

    async fn save_user(&self, user: &User) -> StoreResult<User> {
        self.inner.save_user(user).await
    }

    async fn verified_users_except(&self, id: Uuid) -> StoreResult<Vec<User>> {
        self.inner.verified_users_except(id).await
    }

    async fn mark_online(&self, user_id: Uuid, connection: ConnectionId) -> StoreResult<Option<User>> {
        let result = self.inner.mark_online(user_id, connection).await;
        let first = self.online_calls.fetch_add(1, Ordering::SeqCst) == 0;
        if let (true, Some(delay)) = (first, self.first_online_delay) {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn mark_offline(&self, connection: ConnectionId) -> StoreResult<Option<User>> {
        if self.fail_mark_offline.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.mark_offline(connection).await
    }

    async fn conversation_between(&self, a: Uuid, b: Uuid) -> StoreResult<Option<Conversation>> {
        self.inner.conversation_between(a, b).await
    }

    async fn find_or_create_conversation(&self, a: Uuid, b: Uuid) -> StoreResult<(Conversation, bool)> {
        self.inner.find_or_create_conversation(a, b).await
    }

    async fn conversation(&self, id: Uuid) -> StoreResult<Option<Conversation>> {
        self.inner.conversation(id).await
    }

    async fn conversations_for(&self, user: Uuid) -> StoreResult<Vec<Conversation>> {
        self.inner.conversations_for(user).await
    }

    async fn append_message(&self, conversation_id: Uuid, message: NewMessage) -> StoreResult<Message> {
        self.inner.append_message(conversation_id, message).await
    }

    async fn conversation_messages(&self, id: Uuid) -> StoreResult<Option<Vec<Message>>> {
        self.inner.conversation_messages(id).await
    }
}
