//! Property-based tests for the presence registry

use std::collections::HashMap;

use proptest::prelude::*;
use talks::backend::realtime::{ConnectionId, PresenceRegistry};
use uuid::Uuid;

#[derive(Debug, Clone)]
enum Op {
    /// user index
    Connect(usize),
    /// index into the connections opened so far
    Disconnect(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize).prop_map(Op::Connect),
        (0..16usize).prop_map(Op::Disconnect),
    ]
}

proptest! {
    #[test]
    fn test_lookup_tracks_latest_connection(ops in prop::collection::vec(op(), 0..64)) {
        let users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let registry = PresenceRegistry::new();
        let mut opened: Vec<(Uuid, ConnectionId)> = Vec::new();
        let mut model: HashMap<Uuid, ConnectionId> = HashMap::new();

        for op in ops {
            match op {
                Op::Connect(u) => {
                    let connection = ConnectionId::new();
                    registry.register(users[u], connection);
                    model.insert(users[u], connection);
                    opened.push((users[u], connection));
                }
                Op::Disconnect(i) => {
                    if opened.is_empty() {
                        continue;
                    }
                    let (user, connection) = opened[i % opened.len()];
                    registry.unregister_connection(user, connection);
                    if model.get(&user) == Some(&connection) {
                        model.remove(&user);
                    }
                }
            }

            for user in &users {
                prop_assert_eq!(registry.lookup(*user), model.get(user).copied());
            }
            prop_assert_eq!(registry.len(), model.len());
        }

        let mut snapshot = registry.snapshot();
        snapshot.sort();
        let mut expected: Vec<Uuid> = model.keys().copied().collect();
        expected.sort();
        prop_assert_eq!(snapshot, expected);
    }
}
