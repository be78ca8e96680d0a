//! PostgreSQL store against a live database
//!
//! Runs only when `DATABASE_URL` is set; every test works on freshly
//! created users so runs never collide.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use futures_util::future::join_all;
use pretty_assertions::assert_eq;
use sqlx::postgres::PgPoolOptions;
use talks::backend::auth::users::{NewUser, User};
use talks::backend::realtime::ConnectionId;
use talks::backend::store::{PgStore, Store, StoreError};
use talks::shared::{NewMessage, PresenceStatus};
use uuid::Uuid;

async fn pg_store() -> Option<Arc<PgStore>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    sqlx::migrate!().run(&pool).await.expect("run migrations");
    Some(Arc::new(PgStore::new(pool)))
}

async fn user(store: &PgStore, firstname: &str) -> User {
    store
        .create_user(NewUser {
            firstname: firstname.to_string(),
            lastname: None,
            email: format!("{}-{}@example.com", firstname.to_lowercase(), Uuid::new_v4()),
            password_hash: "not-a-real-hash".to_string(),
            otp_hash: "not-a-real-hash".to_string(),
            otp_expires_at: Utc::now() + Duration::minutes(2),
        })
        .await
        .expect("create user")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_find_or_create_yields_one_conversation() {
    let Some(store) = pg_store().await else {
        return;
    };
    let a = user(&store, "Ada").await;
    let b = user(&store, "Bob").await;

    let calls = (0..8).map(|i| {
        let store = store.clone();
        let (x, y) = if i % 2 == 0 { (a.id, b.id) } else { (b.id, a.id) };
        tokio::spawn(async move { store.find_or_create_conversation(x, y).await })
    });
    let results: Vec<_> = join_all(calls)
        .await
        .into_iter()
        .map(|joined| joined.expect("task").expect("find or create"))
        .collect();

    let created = results.iter().filter(|(_, created)| *created).count();
    assert_eq!(created, 1);
    let id = results[0].0.id;
    assert!(results.iter().all(|(conversation, _)| conversation.id == id));

    assert_eq!(store.conversations_for(a.id).await.unwrap().len(), 1);
    assert_eq!(store.conversations_for(b.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_append_message_keeps_insertion_order_and_preview() {
    let Some(store) = pg_store().await else {
        return;
    };
    let a = user(&store, "Ada").await;
    let b = user(&store, "Bob").await;
    let (conversation, _) = store.find_or_create_conversation(a.id, b.id).await.unwrap();

    let first = store
        .append_message(conversation.id, NewMessage::new(a.id, Some("hi".into()), None, None))
        .await
        .unwrap();
    let second = store
        .append_message(
            conversation.id,
            NewMessage::new(b.id, None, Some("https://media.test/1.png".into()), None),
        )
        .await
        .unwrap();
    let third = store
        .append_message(conversation.id, NewMessage::new(a.id, Some("again".into()), None, None))
        .await
        .unwrap();

    let stored = store.conversation(conversation.id).await.unwrap().unwrap();
    assert_eq!(stored.messages, vec![first.id, second.id, third.id]);
    assert_eq!(stored.last_message.as_deref(), Some("again"));

    let history = store.conversation_messages(conversation.id).await.unwrap().unwrap();
    let ids: Vec<_> = history.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
    assert_eq!(history[1].author, b.id);
    assert_eq!(history[1].image.as_deref(), Some("https://media.test/1.png"));
}

#[tokio::test]
async fn test_append_to_missing_conversation_writes_nothing() {
    let Some(store) = pg_store().await else {
        return;
    };
    let a = user(&store, "Ada").await;
    let missing = Uuid::new_v4();

    let result = store
        .append_message(missing, NewMessage::new(a.id, Some("hi".into()), None, None))
        .await;
    assert_matches!(result, Err(StoreError::Missing(_)));
    assert!(store.conversation_messages(missing).await.unwrap().is_none());
}

#[tokio::test]
async fn test_presence_is_cleared_only_by_the_holding_connection() {
    let Some(store) = pg_store().await else {
        return;
    };
    let a = user(&store, "Ada").await;
    let first = ConnectionId::new();
    let second = ConnectionId::new();

    store.mark_online(a.id, first).await.unwrap();
    store.mark_online(a.id, second).await.unwrap();

    assert!(store.mark_offline(first).await.unwrap().is_none());
    let stored = store.user_by_id(a.id).await.unwrap().unwrap();
    assert_eq!(stored.presence(), PresenceStatus::Online);

    let cleared = store.mark_offline(second).await.unwrap().unwrap();
    assert_eq!(cleared.id, a.id);
    let stored = store.user_by_id(a.id).await.unwrap().unwrap();
    assert_eq!(stored.presence(), PresenceStatus::Offline);
    assert_eq!(stored.connection_id, None);
}
