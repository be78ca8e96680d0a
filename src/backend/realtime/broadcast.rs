/**
 * Periodic Presence Broadcast
 *
 * Every interval the full set of registered users is pushed to every open
 * connection as `getOnlineUsers`. Clients replace their view with it.
 */

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::backend::realtime::connection::ConnectionTable;
use crate::backend::realtime::presence::PresenceRegistry;
use crate::shared::ServerEvent;

/// Push the current online set to every connection
pub fn broadcast_online_users(presence: &PresenceRegistry, connections: &ConnectionTable) -> usize {
    let online = presence.snapshot();
    let online_count = online.len();
    let delivered = connections.send_all(&ServerEvent::online_users(online));
    tracing::debug!(
        "[Realtime] {} online users broadcast to {} connections",
        online_count,
        delivered
    );
    delivered
}

pub fn spawn_presence_broadcast(
    presence: PresenceRegistry,
    connections: ConnectionTable,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            broadcast_online_users(&presence, &connections);
        }
    })
}
