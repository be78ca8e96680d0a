/**
 * Real-time Event System
 *
 * Every frame on the socket is a JSON object `{"event": <name>, "data": {...}}`.
 * Inbound and outbound frames are closed enums so dispatch is exhaustive;
 * a frame is decoded exactly once, at the transport boundary.
 *
 * # Client → Server
 *
 * - `newMessage {message: {author, content?, image?, giphyUrl?}, receiverId}`
 * - `startTyping {userId, conversationId}` / `stopTyping {...}`
 * - `chatHistory {conversationId}`
 *
 * # Server → Client
 *
 * - `userConnected` / `userDisconnected {message, userId, status}`
 * - `startTyping` / `stopTyping {conversationId, typing}`
 * - `newMessage {newMessage}`
 * - `chatHistory {conversationId, history}`
 * - `getOnlineUsers {message, onlineUsers}`
 * - `error {message, error?}`
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::messaging::Message;

/// Stored presence status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceStatus {
    Online,
    Offline,
}

impl PresenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }

    pub fn parse(value: &str) -> Self {
        if value == "Online" {
            Self::Online
        } else {
            Self::Offline
        }
    }
}

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    NewMessage(NewMessageRequest),
    StartTyping(TypingRequest),
    StopTyping(TypingRequest),
    ChatHistory(HistoryRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageRequest {
    pub message: MessageDraft,
    pub receiver_id: Uuid,
}

/// Message body as the client sends it. `image` carries the raw media
/// payload (data URI or remote URL) to be uploaded before storing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    /// Client-claimed author. The server always uses the connection's user.
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub giphy_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingRequest {
    /// The user who should see the indicator
    pub user_id: Uuid,
    pub conversation_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub conversation_id: Uuid,
}

impl ClientEvent {
    /// Decode a text frame
    pub fn decode(frame: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(frame)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "newMessage",
            Self::StartTyping(_) => "startTyping",
            Self::StopTyping(_) => "stopTyping",
            Self::ChatHistory(_) => "chatHistory",
        }
    }
}

/// Events pushed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    UserConnected(PresenceNotice),
    UserDisconnected(PresenceNotice),
    StartTyping(TypingNotice),
    StopTyping(TypingNotice),
    NewMessage(DeliveredMessage),
    ChatHistory(ChatHistory),
    GetOnlineUsers(OnlineUsers),
    Error(ErrorNotice),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceNotice {
    pub message: String,
    pub user_id: Uuid,
    pub status: PresenceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingNotice {
    pub conversation_id: Uuid,
    pub typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredMessage {
    pub new_message: Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub conversation_id: Uuid,
    pub history: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsers {
    pub message: String,
    pub online_users: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerEvent {
    pub fn user_connected(user_id: Uuid, display_name: &str) -> Self {
        Self::UserConnected(PresenceNotice {
            message: format!("User {} has connected.", display_name),
            user_id,
            status: PresenceStatus::Online,
        })
    }

    pub fn user_disconnected(user_id: Uuid, display_name: &str) -> Self {
        Self::UserDisconnected(PresenceNotice {
            message: format!("User {} was disconnected.", display_name),
            user_id,
            status: PresenceStatus::Offline,
        })
    }

    pub fn typing(conversation_id: Uuid, typing: bool) -> Self {
        let notice = TypingNotice { conversation_id, typing };
        if typing {
            Self::StartTyping(notice)
        } else {
            Self::StopTyping(notice)
        }
    }

    pub fn new_message(message: Message) -> Self {
        Self::NewMessage(DeliveredMessage { new_message: message })
    }

    pub fn chat_history(conversation_id: Uuid, history: Vec<Message>) -> Self {
        Self::ChatHistory(ChatHistory { conversation_id, history })
    }

    pub fn online_users(online_users: Vec<Uuid>) -> Self {
        Self::GetOnlineUsers(OnlineUsers {
            message: "success".to_string(),
            online_users,
        })
    }

    pub fn error(message: impl Into<String>, error: Option<String>) -> Self {
        Self::Error(ErrorNotice {
            message: message.into(),
            error,
        })
    }

    pub fn encode(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
