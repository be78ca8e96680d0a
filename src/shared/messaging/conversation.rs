use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A direct conversation between exactly two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    /// Participants in the order the conversation was started
    pub participants: [Uuid; 2],
    /// Message ids in insertion order
    pub messages: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(started_by: Uuid, with: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            participants: [started_by, with],
            messages: Vec::new(),
            last_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn involves(&self, user: Uuid) -> bool {
        self.participants.contains(&user)
    }
}

/// Order-independent key for a participant pair
pub fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
