//! Real-time Connection Layer
//!
//! Maps authenticated WebSocket connections to users, tracks who is online
//! and routes events to the right connection.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── identity.rs     - Credential extraction and verification
//! ├── connection.rs   - Connection ids and the live connection table
//! ├── presence.rs     - User → connection registry
//! ├── gateway.rs      - Connect/disconnect lifecycle and the socket loop
//! ├── router.rs       - Inbound event dispatch and targeted delivery
//! └── broadcast.rs    - Periodic online-users broadcast
//! ```
//!
//! # Presence
//!
//! A user is reachable through at most one connection, the most recently
//! registered one. Older connections from the same user stay open but no
//! longer receive targeted events. Broadcasts (`userConnected`,
//! `userDisconnected`, `getOnlineUsers`) go to every open connection.
//!
//! # Ordering
//!
//! Frames from one connection are handled sequentially in receipt order.
//! There is no ordering across connections.

pub mod identity;

pub mod connection;

pub mod presence;

pub mod gateway;

pub mod router;

pub mod broadcast;

pub use broadcast::{broadcast_online_users, spawn_presence_broadcast};
pub use connection::{ConnectionId, ConnectionTable};
pub use gateway::{handle_socket_upgrade, ConnectedSession, Gateway};
pub use identity::IdentityVerifier;
pub use presence::PresenceRegistry;
pub use router::EventRouter;
