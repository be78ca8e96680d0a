/**
 * Application State
 *
 * `AppState` wires every service together once at startup and is cloned
 * into each handler. All fields are cheap to clone (`Arc`s or handles over
 * `Arc`s), and the realtime services share one presence registry and one
 * connection table.
 *
 * # State Extraction
 *
 * `FromRef` lets handlers take only the service they need:
 *
 * ```rust,ignore
 * async fn handler(State(coordinator): State<ConversationCoordinator>) { /* ... */ }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::mail::Mailer;
use crate::backend::media::MediaHost;
use crate::backend::messaging::coordinator::ConversationCoordinator;
use crate::backend::realtime::{
    ConnectionTable, EventRouter, Gateway, IdentityVerifier, PresenceRegistry,
};
use crate::backend::store::Store;
use crate::shared::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    pub store: Arc<dyn Store>,

    /// Signs and verifies session tokens
    pub sessions: Arc<SessionKeys>,

    /// Credential check shared by the auth middleware and the socket handshake
    pub identity: IdentityVerifier,

    pub mailer: Arc<dyn Mailer>,

    pub media: Arc<dyn MediaHost>,

    /// User → live connection
    pub presence: PresenceRegistry,

    /// Every open socket connection, registered or not
    pub connections: ConnectionTable,

    pub coordinator: ConversationCoordinator,

    /// Targeted delivery of server events
    pub router: EventRouter,

    pub gateway: Gateway,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        media: Arc<dyn MediaHost>,
    ) -> Self {
        let sessions = Arc::new(SessionKeys::new(&config.jwt_secret));
        let identity = IdentityVerifier::new(sessions.clone());
        let presence = PresenceRegistry::new();
        let connections = ConnectionTable::new();
        let coordinator = ConversationCoordinator::new(store.clone(), media.clone());
        let router = EventRouter::new(coordinator.clone(), presence.clone(), connections.clone());
        let gateway = Gateway::new(
            store.clone(),
            presence.clone(),
            connections.clone(),
            router.clone(),
        );

        Self {
            config: Arc::new(config),
            store,
            sessions,
            identity,
            mailer,
            media,
            presence,
            connections,
            coordinator,
            router,
            gateway,
        }
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for ConversationCoordinator {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.coordinator.clone()
    }
}

impl FromRef<AppState> for EventRouter {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.router.clone()
    }
}

impl FromRef<AppState> for PresenceRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mail::LogMailer;
    use crate::backend::media::DisabledMediaHost;
    use crate::backend::store::InMemoryStore;
    use uuid::Uuid;

    fn state() -> AppState {
        let config = AppConfig::builder().jwt_secret("state-secret").build().unwrap();
        AppState::new(
            config,
            Arc::new(InMemoryStore::new()),
            Arc::new(LogMailer),
            Arc::new(DisabledMediaHost),
        )
    }

    #[test]
    fn test_services_share_presence() {
        let state = state();
        let user = Uuid::new_v4();
        let (connection, _rx) = state.connections.open();

        state.presence.register(user, connection);

        let extracted = PresenceRegistry::from_ref(&state);
        assert_eq!(extracted.lookup(user), Some(connection));
        assert_eq!(state.gateway.presence().lookup(user), Some(connection));
        assert!(state.gateway.connections().contains(connection));
    }

    #[test]
    fn test_identity_accepts_issued_tokens() {
        let state = state();
        let user = Uuid::new_v4();
        let token = state.sessions.issue(user).unwrap();
        assert_eq!(state.identity.verify(Some(&token)).unwrap(), user);
    }
}
