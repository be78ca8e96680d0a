/**
 * Connection Gateway
 *
 * Lifecycle of one socket connection:
 *
 * ```text
 * Connecting --verify--> Authenticated --register--> Registered --close--> Disconnected
 *      \--reject (401, no upgrade)
 * ```
 *
 * The credential is checked before the WebSocket upgrade, so an
 * unauthenticated client never gets a connection. After the upgrade one
 * task writes outbound events to the socket while the reader loop handles
 * inbound frames one at a time, in receipt order.
 */

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message as WsMessage, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::realtime::connection::{ConnectionId, ConnectionTable, EventReceiver};
use crate::backend::realtime::identity::handshake_credential;
use crate::backend::realtime::presence::PresenceRegistry;
use crate::backend::realtime::router::EventRouter;
use crate::backend::server::state::AppState;
use crate::backend::store::Store;
use crate::shared::{ClientEvent, ServerEvent};

/// An accepted connection bound to its user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectedSession {
    pub id: ConnectionId,
    pub user_id: Uuid,
}

#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn Store>,
    presence: PresenceRegistry,
    connections: ConnectionTable,
    router: EventRouter,
}

impl Gateway {
    pub fn new(
        store: Arc<dyn Store>,
        presence: PresenceRegistry,
        connections: ConnectionTable,
        router: EventRouter,
    ) -> Self {
        Self {
            store,
            presence,
            connections,
            router,
        }
    }

    /// Open a connection for an authenticated user, mark them online and
    /// announce it to everyone else. The receiver yields this connection's
    /// outbound events.
    pub async fn connect(&self, user_id: Uuid) -> (ConnectedSession, EventReceiver) {
        let (id, events) = self.connections.open();

        match self.store.mark_online(user_id, id).await {
            Ok(Some(user)) => {
                if let Some(previous) = self.presence.register(user_id, id) {
                    tracing::debug!("[Gateway] {} superseded connection {}", user_id, previous);
                }
                let notified = self
                    .connections
                    .send_all_except(id, &ServerEvent::user_connected(user_id, &user.display_name()));
                tracing::info!(
                    "[Gateway] {} connected on {} ({} notified)",
                    user_id,
                    id,
                    notified
                );
            }
            Ok(None) => {
                tracing::warn!("[Gateway] No user record for {}; connection {} stays unregistered", user_id, id);
            }
            Err(e) => {
                tracing::error!("[Gateway] Failed to persist presence for {}: {}", user_id, e);
            }
        }

        (ConnectedSession { id, user_id }, events)
    }

    /// Tear down a connection. Fires once per connection. The registry entry
    /// goes whenever it still points here; the status write and broadcast
    /// only happen for the user record that holds this connection.
    pub async fn disconnect(&self, session: &ConnectedSession) {
        let id = session.id;
        self.connections.close(id);

        if self.presence.unregister_connection(session.user_id, id) {
            tracing::debug!("[Gateway] {} unregistered from {}", session.user_id, id);
        }

        match self.store.mark_offline(id).await {
            Ok(Some(user)) => {
                let notified = self
                    .connections
                    .send_all(&ServerEvent::user_disconnected(user.id, &user.display_name()));
                tracing::info!("[Gateway] {} disconnected from {} ({} notified)", user.id, id, notified);
            }
            Ok(None) => {
                tracing::debug!("[Gateway] Connection {} was not held by any user; nothing to clear", id);
            }
            Err(e) => {
                tracing::error!("[Gateway] Failed to clear presence for {}: {}", id, e);
            }
        }
    }

    /// Decode and dispatch one text frame. Failures go back to the
    /// originating connection as an `error` event.
    pub async fn handle_text(&self, session: &ConnectedSession, text: &str) {
        let event = match ClientEvent::decode(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!("[Gateway] Malformed frame on {}: {}", session.id, e);
                self.connections
                    .send_to(session.id, BackendError::from(e).to_event());
                return;
            }
        };

        let name = event.name();
        if let Err(e) = self.router.dispatch(session.id, session.user_id, event).await {
            tracing::warn!("[Gateway] {} from {} failed: {}", name, session.user_id, e);
            self.connections.send_to(session.id, e.to_event());
        }
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn connections(&self) -> &ConnectionTable {
        &self.connections
    }
}

/// Handshake auth data passed on the upgrade URL
#[derive(Debug, Default, Deserialize)]
pub struct HandshakeParams {
    pub token: Option<String>,
    pub jwt: Option<String>,
}

/// `GET /ws`: verify the credential, then upgrade. The credential is
/// checked before the upgrade headers so a bad token is always a 401.
pub async fn handle_socket_upgrade(
    State(state): State<AppState>,
    Query(params): Query<HandshakeParams>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, BackendError> {
    let credential = handshake_credential(params.token.or(params.jwt), &headers);
    let user_id = state.identity.verify(credential.as_deref()).map_err(|e| {
        tracing::warn!("[Gateway] Rejected socket handshake: {}", e);
        e
    })?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let gateway = state.gateway.clone();
    Ok(ws.on_upgrade(move |socket| run_connection(gateway, user_id, socket)))
}

async fn run_connection(gateway: Gateway, user_id: Uuid, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();
    let (session, mut outbound) = gateway.connect(user_id).await;
    let connection = session.id;

    let mut writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match event.encode() {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Gateway] Could not encode event for {}: {}", connection, e);
                    continue;
                }
            };
            if sink.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => gateway.handle_text(&session, text.as_str()).await,
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!("[Gateway] Socket error on {}: {}", connection, e);
                    break;
                }
            },
            _ = &mut writer => break,
        }
    }

    gateway.disconnect(&session).await;
    writer.abort();
}
