use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::backend::realtime::connection::ConnectionId;

/// In-memory map from user to their reachable connection.
///
/// One connection per user: a later `register` replaces the earlier one.
/// Locks are held only for the map operation itself.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    entries: Arc<RwLock<HashMap<Uuid, ConnectionId>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the connection this replaced, if any
    pub fn register(&self, user_id: Uuid, connection: ConnectionId) -> Option<ConnectionId> {
        self.entries.write().insert(user_id, connection)
    }

    pub fn unregister(&self, user_id: Uuid) -> Option<ConnectionId> {
        self.entries.write().remove(&user_id)
    }

    /// Remove the entry only if it still points at `connection`
    pub fn unregister_connection(&self, user_id: Uuid, connection: ConnectionId) -> bool {
        let mut entries = self.entries.write();
        if entries.get(&user_id) == Some(&connection) {
            entries.remove(&user_id);
            true
        } else {
            false
        }
    }

    pub fn lookup(&self, user_id: Uuid) -> Option<ConnectionId> {
        self.entries.read().get(&user_id).copied()
    }

    pub fn snapshot(&self) -> Vec<Uuid> {
        self.entries.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
