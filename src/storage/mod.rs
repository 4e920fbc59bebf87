use crate::config::StorageConfig;
use crate::domain::message::{Message, NewMessage};
use crate::domain::user::User;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;
pub mod postgres;
pub mod records;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("User already exists: {0}")]
    UserExists(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Backing store for users and the single shared conversation.
///
/// Implementations serialize writes so that concurrent creates and clears never
/// interleave into a partially written collection.
#[async_trait]
pub trait MessageStore: Send + Sync + Debug {
    /// Exact-match lookup on the stored username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Registers a new user.
    ///
    /// # Errors
    /// Returns `StorageError::UserExists` if the username is already taken.
    async fn create_user(&self, username: &str) -> Result<User>;

    /// All messages in creation order.
    async fn get_all_messages(&self) -> Result<Vec<Message>>;

    /// Assigns an id and server timestamp and appends the message.
    async fn create_message(&self, message: NewMessage) -> Result<Message>;

    /// Removes every message. Succeeds on an already empty store.
    async fn delete_all_messages(&self) -> Result<()>;

    /// Cheap connectivity check for readiness.
    async fn ping(&self) -> Result<()>;
}

/// Opens the configured backend: PostgreSQL when a database URL is set, memory otherwise.
///
/// # Errors
/// Returns `StorageError` if the database is unreachable or migrations fail.
pub async fn init_store(config: &StorageConfig) -> Result<Arc<dyn MessageStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.max_connections).await?;
            store.migrate().await?;
            tracing::info!(backend = "postgres", "message store ready");
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!(backend = "memory", "message store ready");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
