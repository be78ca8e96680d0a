//! Conversation and message HTTP handlers.
//!
//! Thin wrappers over `ConversationCoordinator`; `send_message` also pushes
//! the stored message to the recipient's live connection.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::messaging::coordinator::{ConversationCoordinator, OutgoingMessage};
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::realtime::EventRouter;
use crate::shared::{Conversation, Message};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationRequest {
    pub user_id: Uuid,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Recipient
    pub user_id: Uuid,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub giphy_url: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ConversationResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub conversation: Conversation,
}

#[derive(Serialize, Debug)]
pub struct ConversationListResponse {
    pub status: &'static str,
    pub results: usize,
    pub conversations: Vec<Conversation>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub new_message: Message,
}

/// `POST /api/v1/conversation/start`: 201 when created, 200 when it exists
pub async fn start_conversation(
    State(coordinator): State<ConversationCoordinator>,
    auth: AuthUser,
    ApiJson(request): ApiJson<StartConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), BackendError> {
    let (conversation, created) = coordinator
        .start_conversation(auth.0.user_id, request.user_id)
        .await?;

    let (status, message) = if created {
        (StatusCode::CREATED, "New conversation created!")
    } else {
        (StatusCode::OK, "Conversation already exists!")
    };

    Ok((
        status,
        Json(ConversationResponse {
            status: "success",
            message,
            conversation,
        }),
    ))
}

/// `GET /api/v1/conversation`
pub async fn list_conversations(
    State(coordinator): State<ConversationCoordinator>,
    auth: AuthUser,
) -> Result<Json<ConversationListResponse>, BackendError> {
    let conversations = coordinator.list_conversations(auth.0.user_id).await?;
    Ok(Json(ConversationListResponse {
        status: "success",
        results: conversations.len(),
        conversations,
    }))
}

/// `POST /api/v1/message/send`
pub async fn send_message(
    State(coordinator): State<ConversationCoordinator>,
    State(events): State<EventRouter>,
    auth: AuthUser,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), BackendError> {
    let outgoing = OutgoingMessage {
        content: request.content,
        media: request.image,
        gif_url: request.giphy_url,
    };

    let message = coordinator
        .send_message(auth.0.user_id, request.user_id, outgoing)
        .await?;
    events.deliver_new_message(request.user_id, message.clone());

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            status: "success",
            message: "New message created and sent successfully!",
            new_message: message,
        }),
    ))
}
