/**
 * PostgreSQL Store
 *
 * `sqlx` implementation of [`Store`]. Schema lives in `migrations/`.
 *
 * The conversations table carries a unique index on
 * `(LEAST(participant_a, participant_b), GREATEST(participant_a, participant_b))`,
 * so find-or-create is an `INSERT ... ON CONFLICT DO NOTHING` followed by a
 * lookup. Appending a message runs in one transaction with the conversation
 * row locked.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::backend::auth::users::{NewUser, User};
use crate::backend::realtime::connection::ConnectionId;
use crate::shared::{Conversation, Message, NewMessage};

const USER_COLUMNS: &str = "id, firstname, lastname, email, password_hash, avatar, job_title, bio, \
     country, verified, otp_hash, otp_expires_at, password_changed_at, status, connection_id, \
     created_at, updated_at";

const CONVERSATION_SELECT: &str = "SELECT c.id, c.participant_a, c.participant_b, c.last_message, \
     c.created_at, c.updated_at, \
     ARRAY(SELECT m.id FROM messages m WHERE m.conversation_id = c.id ORDER BY m.seq) AS message_ids \
     FROM conversations c";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    participant_a: Uuid,
    participant_b: Uuid,
    last_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    message_ids: Vec<Uuid>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Conversation {
            id: row.id,
            participants: [row.participant_a, row.participant_b],
            messages: row.message_ids,
            last_message: row.last_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    author_id: Uuid,
    content: Option<String>,
    image: Option<String>,
    giphy_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            author: row.author_id,
            content: row.content,
            image: row.image,
            giphy_url: row.giphy_url,
            created_at: row.created_at,
        }
    }
}

fn conflict_or_database(err: sqlx::Error, what: &str) -> StoreError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => StoreError::Conflict(what.to_string()),
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, firstname, lastname, email, password_hash, otp_hash, otp_expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.firstname)
            .bind(&user.lastname)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.otp_hash)
            .bind(user.otp_expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or_database(e, "email"))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_user(&self, user: &User) -> StoreResult<User> {
        let sql = format!(
            "UPDATE users SET firstname = $2, lastname = $3, password_hash = $4, avatar = $5, \
             job_title = $6, bio = $7, country = $8, verified = $9, otp_hash = $10, \
             otp_expires_at = $11, password_changed_at = $12, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.firstname)
            .bind(&user.lastname)
            .bind(&user.password_hash)
            .bind(&user.avatar)
            .bind(&user.job_title)
            .bind(&user.bio)
            .bind(&user.country)
            .bind(user.verified)
            .bind(&user.otp_hash)
            .bind(user.otp_expires_at)
            .bind(user.password_changed_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::Missing("User"))
    }

    async fn verified_users_except(&self, id: Uuid) -> StoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE verified = TRUE AND id <> $1 ORDER BY created_at",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn mark_online(&self, user_id: Uuid, connection: ConnectionId) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET connection_id = $2, status = 'Online', updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(connection.as_uuid())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn mark_offline(&self, connection: ConnectionId) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET connection_id = NULL, status = 'Offline', updated_at = NOW() \
             WHERE connection_id = $1 RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(connection.as_uuid())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn conversation_between(&self, a: Uuid, b: Uuid) -> StoreResult<Option<Conversation>> {
        let sql = format!(
            "{} WHERE LEAST(c.participant_a, c.participant_b) = LEAST($1::uuid, $2::uuid) \
             AND GREATEST(c.participant_a, c.participant_b) = GREATEST($1::uuid, $2::uuid)",
            CONVERSATION_SELECT
        );
        let row = sqlx::query_as::<_, ConversationRow>(&sql)
            .bind(a)
            .bind(b)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Conversation::from))
    }

    async fn find_or_create_conversation(&self, a: Uuid, b: Uuid) -> StoreResult<(Conversation, bool)> {
        let inserted: Option<(Uuid,)> = sqlx::query_as(
            "INSERT INTO conversations (id, participant_a, participant_b) VALUES ($1, $2, $3) \
             ON CONFLICT ((LEAST(participant_a, participant_b)), (GREATEST(participant_a, participant_b))) \
             DO NOTHING RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        let conversation = self
            .conversation_between(a, b)
            .await?
            .ok_or(StoreError::Missing("Conversation"))?;
        Ok((conversation, inserted.is_some()))
    }

    async fn conversation(&self, id: Uuid) -> StoreResult<Option<Conversation>> {
        let sql = format!("{} WHERE c.id = $1", CONVERSATION_SELECT);
        let row = sqlx::query_as::<_, ConversationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Conversation::from))
    }

    async fn conversations_for(&self, user: Uuid) -> StoreResult<Vec<Conversation>> {
        let sql = format!(
            "{} WHERE c.participant_a = $1 OR c.participant_b = $1 ORDER BY c.updated_at DESC",
            CONVERSATION_SELECT
        );
        let rows = sqlx::query_as::<_, ConversationRow>(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Conversation::from).collect())
    }

    async fn append_message(&self, conversation_id: Uuid, message: NewMessage) -> StoreResult<Message> {
        let preview = message.preview();
        let mut tx = self.pool.begin().await?;

        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM conversations WHERE id = $1 FOR UPDATE")
                .bind(conversation_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(StoreError::Missing("Conversation"));
        }

        let row = sqlx::query_as::<_, MessageRow>(
            "INSERT INTO messages (id, conversation_id, author_id, content, image, giphy_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, author_id, content, image, giphy_url, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(conversation_id)
        .bind(message.author)
        .bind(&message.content)
        .bind(&message.image)
        .bind(&message.giphy_url)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET last_message = $2, updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .bind(&preview)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn conversation_messages(&self, id: Uuid) -> StoreResult<Option<Vec<Message>>> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT id, author_id, content, image, giphy_url, created_at \
             FROM messages WHERE conversation_id = $1 ORDER BY seq",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(Some(rows.into_iter().map(Message::from).collect()))
    }
}
