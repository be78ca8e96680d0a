//! Online-users broadcast against live gateway sessions

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use talks::backend::realtime::broadcast_online_users;
use talks::shared::event::OnlineUsers;
use talks::shared::ServerEvent;
use uuid::Uuid;

use crate::common::*;

#[tokio::test]
async fn test_broadcast_with_no_registered_users() {
    let app = TestApp::new();
    let gateway = &app.state.gateway;

    // connections for users without a record stay unregistered
    let (_a, mut rx_a) = gateway.connect(Uuid::new_v4()).await;
    let (_b, mut rx_b) = gateway.connect(Uuid::new_v4()).await;

    let delivered = broadcast_online_users(gateway.presence(), gateway.connections());
    assert_eq!(delivered, 2);

    for rx in [&mut rx_a, &mut rx_b] {
        assert_eq!(next_event(rx), ServerEvent::online_users(vec![]));
    }
}

#[tokio::test]
async fn test_broadcast_lists_registered_users() {
    let app = TestApp::new();
    let (u1, _) = app.verified_user("Ada", "ada@example.com").await;
    let (u2, _) = app.verified_user("Bob", "bob@example.com").await;
    let gateway = &app.state.gateway;

    let (_s1, mut rx1) = gateway.connect(u1.id).await;
    let (_s2, _rx2) = gateway.connect(u2.id).await;
    let _ = next_event(&mut rx1);

    broadcast_online_users(gateway.presence(), gateway.connections());

    assert_matches!(
        next_event(&mut rx1),
        ServerEvent::GetOnlineUsers(OnlineUsers { message, mut online_users }) => {
            assert_eq!(message, "success");
            online_users.sort();
            let mut expected = vec![u1.id, u2.id];
            expected.sort();
            assert_eq!(online_users, expected);
        }
    );
}
