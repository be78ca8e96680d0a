/**
 * Event Router
 *
 * Dispatches decoded client events and delivers the resulting server
 * events. Delivery to a user goes through the presence registry: if the
 * user has no registered connection the event is dropped.
 */

use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::messaging::coordinator::{ConversationCoordinator, OutgoingMessage};
use crate::backend::realtime::connection::{ConnectionId, ConnectionTable};
use crate::backend::realtime::presence::PresenceRegistry;
use crate::shared::event::{HistoryRequest, NewMessageRequest, TypingRequest};
use crate::shared::{ClientEvent, Message, ServerEvent};

#[derive(Clone)]
pub struct EventRouter {
    coordinator: ConversationCoordinator,
    presence: PresenceRegistry,
    connections: ConnectionTable,
}

impl EventRouter {
    pub fn new(
        coordinator: ConversationCoordinator,
        presence: PresenceRegistry,
        connections: ConnectionTable,
    ) -> Self {
        Self {
            coordinator,
            presence,
            connections,
        }
    }

    /// Handle one event from `origin`, authenticated as `user_id`
    pub async fn dispatch(
        &self,
        origin: ConnectionId,
        user_id: Uuid,
        event: ClientEvent,
    ) -> Result<(), BackendError> {
        match event {
            ClientEvent::StartTyping(request) => {
                self.relay_typing(request, true);
                Ok(())
            }
            ClientEvent::StopTyping(request) => {
                self.relay_typing(request, false);
                Ok(())
            }
            ClientEvent::ChatHistory(request) => self.send_history(origin, user_id, request).await,
            ClientEvent::NewMessage(request) => self.send_message(user_id, request).await,
        }
    }

    /// Push an event to a user's registered connection, if any
    pub fn deliver_to_user(&self, user_id: Uuid, event: ServerEvent) -> bool {
        match self.presence.lookup(user_id) {
            Some(connection) => self.connections.send_to(connection, event),
            None => false,
        }
    }

    pub fn deliver_new_message(&self, receiver: Uuid, message: Message) -> bool {
        let delivered = self.deliver_to_user(receiver, ServerEvent::new_message(message));
        if !delivered {
            tracing::debug!("[Router] {} is offline; message stored only", receiver);
        }
        delivered
    }

    fn relay_typing(&self, request: TypingRequest, typing: bool) {
        let event = ServerEvent::typing(request.conversation_id, typing);
        if !self.deliver_to_user(request.user_id, event) {
            tracing::trace!("[Router] Dropped typing indicator for offline user {}", request.user_id);
        }
    }

    async fn send_history(
        &self,
        origin: ConnectionId,
        user_id: Uuid,
        request: HistoryRequest,
    ) -> Result<(), BackendError> {
        let history = self.coordinator.history(user_id, request.conversation_id).await?;
        self.connections
            .send_to(origin, ServerEvent::chat_history(request.conversation_id, history));
        Ok(())
    }

    async fn send_message(&self, sender: Uuid, request: NewMessageRequest) -> Result<(), BackendError> {
        let NewMessageRequest { message, receiver_id } = request;
        let outgoing = OutgoingMessage {
            content: message.content,
            media: message.image,
            gif_url: message.giphy_url,
        };

        let stored = self.coordinator.send_message(sender, receiver_id, outgoing).await?;
        self.deliver_new_message(receiver_id, stored);
        Ok(())
    }
}
