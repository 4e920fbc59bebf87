use crate::domain::message::{Message, NewMessage};
use crate::domain::user::User;
use crate::storage::{MessageStore, Result, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, User>,
    messages: Vec<Message>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(username).cloned())
    }

    async fn create_user(&self, username: &str) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(username) {
            return Err(StorageError::UserExists(username.to_string()));
        }

        let user = User::new(username);
        inner.users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    async fn get_all_messages(&self) -> Result<Vec<Message>> {
        Ok(self.inner.read().await.messages.clone())
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message> {
        let mut inner = self.inner.write().await;
        let message = message.into_message();
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn delete_all_messages(&self) -> Result<()> {
        self.inner.write().await.messages.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
