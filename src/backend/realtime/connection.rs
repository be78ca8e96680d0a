/**
 * Live Connections
 *
 * Each accepted socket gets a `ConnectionId` and an unbounded outbound
 * channel. A writer task drains the channel into the socket; everything
 * else in the backend delivers by pushing onto the channel through
 * `ConnectionTable`.
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Opaque identifier of one live socket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ConnectionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub type EventSender = mpsc::UnboundedSender<ServerEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// Every connection currently open on this process, registered or not
#[derive(Clone, Default)]
pub struct ConnectionTable {
    senders: Arc<RwLock<HashMap<ConnectionId, EventSender>>>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new connection and return its outbound receiver
    pub fn open(&self) -> (ConnectionId, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new();
        self.senders.write().insert(id, tx);
        (id, rx)
    }

    pub fn close(&self, id: ConnectionId) -> bool {
        self.senders.write().remove(&id).is_some()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.senders.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.senders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver to one connection. `false` if it is gone.
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        match self.senders.read().get(&id) {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Deliver to every connection, returning how many accepted it
    pub fn send_all(&self, event: &ServerEvent) -> usize {
        self.fan_out(event, None)
    }

    /// Deliver to every connection except `skip`
    pub fn send_all_except(&self, skip: ConnectionId, event: &ServerEvent) -> usize {
        self.fan_out(event, Some(skip))
    }

    fn fan_out(&self, event: &ServerEvent, skip: Option<ConnectionId>) -> usize {
        let senders = self.senders.read();
        senders
            .iter()
            .filter(|(id, _)| Some(**id) != skip)
            .filter(|(_, tx)| tx.send(event.clone()).is_ok())
            .count()
    }
}
