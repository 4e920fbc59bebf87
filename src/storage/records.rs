use crate::domain::message::Message;
use crate::domain::user::User;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRecord {
    pub(crate) id: Uuid,
    pub(crate) username: String,
    pub(crate) created_at: OffsetDateTime,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self { id: record.id, username: record.username, created_at: record.created_at }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageRecord {
    pub(crate) id: Uuid,
    pub(crate) sender: String,
    pub(crate) text: String,
    pub(crate) created_at: OffsetDateTime,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self { id: record.id, sender: record.sender, text: record.text, timestamp: record.created_at }
    }
}
