use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub author: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Hosted media URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giphy_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A message that has not been persisted yet. Media has already been
/// uploaded, so `image` is a URL here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub author: Uuid,
    pub content: Option<String>,
    pub image: Option<String>,
    pub giphy_url: Option<String>,
}

impl NewMessage {
    pub fn new(
        author: Uuid,
        content: Option<String>,
        image: Option<String>,
        giphy_url: Option<String>,
    ) -> Self {
        Self {
            author,
            content: non_blank(content),
            image: non_blank(image),
            giphy_url: non_blank(giphy_url),
        }
    }

    /// Preview text shown in conversation lists
    pub fn preview(&self) -> String {
        if let Some(content) = &self.content {
            content.clone()
        } else if self.image.is_some() {
            "[Image]".to_string()
        } else if self.giphy_url.is_some() {
            "[GIF]".to_string()
        } else {
            String::new()
        }
    }

    pub fn into_message(self, id: Uuid, created_at: DateTime<Utc>) -> Message {
        Message {
            id,
            author: self.author,
            content: self.content,
            image: self.image,
            giphy_url: self.giphy_url,
            created_at,
        }
    }
}

/// Trims text fields; blank input counts as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
