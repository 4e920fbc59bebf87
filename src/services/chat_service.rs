use crate::config::ChatConfig;
use crate::domain::allow_list::AllowList;
use crate::domain::message::{Message, NewMessage};
use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::storage::{MessageStore, StorageError};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;

pub const INVALID_USERNAME: &str = "Invalid username";
pub const INVALID_MESSAGE_DATA: &str = "Invalid message data";

#[derive(Clone, Debug)]
struct Metrics {
    logins_total: Counter<u64>,
    sent_total: Counter<u64>,
    cleared_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("homechat-server");
        Self {
            logins_total: meter
                .u64_counter("homechat_logins_total")
                .with_description("Login attempts by outcome")
                .build(),
            sent_total: meter
                .u64_counter("homechat_messages_sent_total")
                .with_description("Message submissions by outcome")
                .build(),
            cleared_total: meter
                .u64_counter("homechat_messages_cleared_total")
                .with_description("Number of times the conversation was cleared")
                .build(),
        }
    }
}

/// The four chat operations, with allow-list admission in front of the store.
#[derive(Clone, Debug)]
pub struct ChatService {
    store: Arc<dyn MessageStore>,
    allow_list: AllowList,
    max_message_chars: usize,
    metrics: Metrics,
}

impl ChatService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>, allow_list: AllowList, config: &ChatConfig) -> Self {
        Self { store, allow_list, max_message_chars: config.max_message_chars, metrics: Metrics::new() }
    }

    /// Admits an allow-listed name, registering it on first use.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the username is empty.
    /// Returns `AppError::Forbidden` if the username is not allow-listed.
    /// Returns `AppError::Storage` if the store fails.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn login(&self, username: &str) -> Result<User> {
        if username.is_empty() {
            return Err(AppError::BadRequest(INVALID_USERNAME.to_string()));
        }

        if !self.allow_list.contains(username) {
            self.metrics.logins_total.add(1, &[KeyValue::new("status", "denied")]);
            return Err(AppError::Forbidden(format!(
                "Access denied. This is a private chat for {} only.",
                self.allow_list
            )));
        }

        let user = match self.store.get_user_by_username(username).await? {
            Some(user) => user,
            None => match self.store.create_user(username).await {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, "user registered on first login");
                    user
                }
                // Lost a race with a concurrent first login for the same name.
                Err(StorageError::UserExists(_)) => {
                    self.store.get_user_by_username(username).await?.ok_or(AppError::Internal)?
                }
                Err(e) => return Err(e.into()),
            },
        };

        self.metrics.logins_total.add(1, &[KeyValue::new("status", "success")]);
        Ok(user)
    }

    /// # Errors
    /// Returns `AppError::Storage` if the store fails.
    #[tracing::instrument(skip(self), err)]
    pub async fn list_messages(&self) -> Result<Vec<Message>> {
        Ok(self.store.get_all_messages().await?)
    }

    /// Stores a message from an allow-listed sender. The text is kept verbatim.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the sender or text is empty or the text is too long.
    /// Returns `AppError::Forbidden` if the sender is not allow-listed.
    /// Returns `AppError::Storage` if the store fails.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()), err(level = "warn"))]
    pub async fn send_message(&self, sender: String, text: String) -> Result<Message> {
        if sender.is_empty() || text.is_empty() {
            return Err(AppError::BadRequest(INVALID_MESSAGE_DATA.to_string()));
        }

        if text.chars().count() > self.max_message_chars {
            return Err(AppError::BadRequest(format!(
                "Message exceeds the maximum length of {} characters",
                self.max_message_chars
            )));
        }

        if !self.allow_list.contains(&sender) {
            self.metrics.sent_total.add(1, &[KeyValue::new("status", "denied")]);
            return Err(AppError::Forbidden("Unauthorized sender".to_string()));
        }

        match self.store.create_message(NewMessage { sender, text }).await {
            Ok(message) => {
                tracing::debug!(message_id = %message.id, "message stored");
                self.metrics.sent_total.add(1, &[KeyValue::new("status", "success")]);
                Ok(message)
            }
            Err(e) => {
                self.metrics.sent_total.add(1, &[KeyValue::new("status", "failure")]);
                Err(e.into())
            }
        }
    }

    /// Clears the whole conversation.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the store fails.
    #[tracing::instrument(skip(self), err)]
    pub async fn delete_all_messages(&self) -> Result<()> {
        self.store.delete_all_messages().await?;
        tracing::info!("conversation cleared");
        self.metrics.cleared_total.add(1, &[]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> ChatService {
        let config = ChatConfig { allowed_users: vec!["akshu".into(), "paru".into()], max_message_chars: 20 };
        let allow_list = AllowList::new(&config.allowed_users).unwrap();
        ChatService::new(Arc::new(MemoryStore::new()), allow_list, &config)
    }

    #[tokio::test]
    async fn test_login_creates_user_once() {
        let service = service();
        let first = service.login("akshu").await.unwrap();
        let second = service.login("akshu").await.unwrap();
        assert_eq!(first.username, "akshu");
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_name_without_creating_user() {
        let service = service();
        let result = service.login("random").await;
        assert!(matches!(result, Err(AppError::Forbidden(msg)) if msg.contains("akshu and paru")));
        assert!(service.store.get_user_by_username("random").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_name() {
        let result = service().login("").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_send_keeps_content_verbatim() {
        let service = service();
        let message = service.send_message("paru".into(), "  hi there ".into()).await.unwrap();
        assert_eq!(message.sender, "paru");
        assert_eq!(message.text, "  hi there ");
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_accepted() {
        let service = service();
        let message = service.send_message("akshu".into(), "   ".into()).await.unwrap();
        assert_eq!(message.text, "   ");
    }

    #[tokio::test]
    async fn test_send_validation_precedes_authorization() {
        let service = service();
        assert!(matches!(service.send_message("random".into(), String::new()).await, Err(AppError::BadRequest(_))));
        assert!(matches!(service.send_message(String::new(), "hi".into()).await, Err(AppError::BadRequest(_))));
        assert!(matches!(service.send_message("random".into(), "hi".into()).await, Err(AppError::Forbidden(_))));
        assert!(service.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_rejects_overlong_text() {
        let service = service();
        let text = "x".repeat(21);
        assert!(matches!(service.send_message("akshu".into(), text).await, Err(AppError::BadRequest(_))));
        // Limit counts characters, not bytes.
        let text = "é".repeat(20);
        assert!(service.send_message("akshu".into(), text).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_all_then_list_is_empty() {
        let service = service();
        service.send_message("akshu".into(), "one".into()).await.unwrap();
        service.send_message("paru".into(), "two".into()).await.unwrap();
        assert_eq!(service.list_messages().await.unwrap().len(), 2);

        service.delete_all_messages().await.unwrap();
        service.delete_all_messages().await.unwrap();
        assert!(service.list_messages().await.unwrap().is_empty());
    }
}
