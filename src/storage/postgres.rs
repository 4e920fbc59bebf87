use crate::domain::message::{Message, NewMessage};
use crate::domain::user::User;
use crate::storage::records::{MessageRecord, UserRecord};
use crate::storage::{MessageStore, Result, StorageError};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;

pub type DbPool = Pool<Postgres>;

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed store. Message order follows the `seq` column.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    /// Connects a pool to the given database.
    ///
    /// # Errors
    /// Returns `StorageError::Database` if the connection fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    /// Returns `StorageError::Migration` if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for PgStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            SELECT id, username, created_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn create_user(&self, username: &str) -> Result<User> {
        let user = User::new(username);
        let result = sqlx::query_as::<_, UserRecord>(
            r"
            INSERT INTO users (id, username, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, username, created_at
            ",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => Ok(record.into()),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StorageError::UserExists(username.to_string()))
            }
            Err(e) => Err(StorageError::Database(e)),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_all_messages(&self) -> Result<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r"
            SELECT id, sender, text, created_at
            FROM messages
            ORDER BY seq ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(level = "debug", skip(self, message), fields(sender = %message.sender))]
    async fn create_message(&self, message: NewMessage) -> Result<Message> {
        let message = message.into_message();
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            INSERT INTO messages (id, sender, text, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender, text, created_at
            ",
        )
        .bind(message.id)
        .bind(&message.sender)
        .bind(&message.text)
        .bind(message.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete_all_messages(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM messages").execute(&self.pool).await?;
        tracing::debug!(deleted = result.rows_affected(), "messages cleared");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
