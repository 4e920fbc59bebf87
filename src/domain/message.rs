use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// A message that has passed validation but has not been assigned an id or timestamp yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: String,
    pub text: String,
}

impl NewMessage {
    /// Stamps the message with a fresh id and the current server time.
    #[must_use]
    pub fn into_message(self) -> Message {
        Message { id: Uuid::now_v7(), sender: self.sender, text: self.text, timestamp: OffsetDateTime::now_utc() }
    }
}
