/**
 * Conversation/Message Coordinator
 *
 * Owns the rules for starting conversations and sending messages. Both the
 * socket `newMessage` event and `POST /message/send` go through here.
 *
 * Sending a message:
 * 1. upload the media payload, if any (failure aborts the send)
 * 2. find the conversation between sender and receiver, in either order
 * 3. append the message and update the preview as one store operation
 */

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::media::MediaHost;
use crate::backend::store::Store;
use crate::shared::{Conversation, Message, NewMessage};

pub const CONVERSATION_REQUIRED: &str = "Conversation not found. Start a conversation first.";

/// Message content as submitted, before media upload
#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    /// Data URI or remote URL to upload
    pub media: Option<String>,
    pub gif_url: Option<String>,
}

#[derive(Clone)]
pub struct ConversationCoordinator {
    store: Arc<dyn Store>,
    media: Arc<dyn MediaHost>,
}

impl ConversationCoordinator {
    pub fn new(store: Arc<dyn Store>, media: Arc<dyn MediaHost>) -> Self {
        Self { store, media }
    }

    pub async fn send_message(
        &self,
        sender: Uuid,
        receiver: Uuid,
        outgoing: OutgoingMessage,
    ) -> Result<Message, BackendError> {
        let image = match outgoing.media.filter(|m| !m.trim().is_empty()) {
            Some(payload) => Some(self.media.upload(&payload).await.map_err(|e| {
                tracing::warn!("[Coordinator] Media upload failed for {}: {}", sender, e);
                e
            })?),
            None => None,
        };

        let conversation = self
            .store
            .conversation_between(sender, receiver)
            .await?
            .ok_or_else(|| BackendError::not_found(CONVERSATION_REQUIRED))?;

        let draft = NewMessage::new(sender, outgoing.content, image, outgoing.gif_url);
        let message = self.store.append_message(conversation.id, draft).await?;

        tracing::debug!(
            "[Coordinator] {} -> {} in conversation {}",
            sender,
            receiver,
            conversation.id
        );
        Ok(message)
    }

    /// Existing conversation for the pair, or a new one. The flag is `true`
    /// when this call created it.
    pub async fn start_conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<(Conversation, bool), BackendError> {
        if user_a == user_b {
            return Err(BackendError::validation("You cannot start a conversation with yourself."));
        }
        if self.store.user_by_id(user_b).await?.is_none() {
            return Err(BackendError::not_found("User not found."));
        }

        let (conversation, created) = self.store.find_or_create_conversation(user_a, user_b).await?;
        if created {
            tracing::info!("[Coordinator] Conversation {} started by {}", conversation.id, user_a);
        }
        Ok((conversation, created))
    }

    pub async fn list_conversations(&self, user: Uuid) -> Result<Vec<Conversation>, BackendError> {
        Ok(self.store.conversations_for(user).await?)
    }

    /// Messages of a conversation the requester takes part in
    pub async fn history(&self, requester: Uuid, conversation_id: Uuid) -> Result<Vec<Message>, BackendError> {
        let conversation = self
            .store
            .conversation(conversation_id)
            .await?
            .filter(|c| c.involves(requester))
            .ok_or_else(|| BackendError::not_found("Conversation not found"))?;

        Ok(self
            .store
            .conversation_messages(conversation.id)
            .await?
            .unwrap_or_default())
    }
}
