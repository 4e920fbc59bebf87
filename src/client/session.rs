use crate::client::api::{ChatClient, ClientError, Result};
use crate::domain::user::User;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn { user: User },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    username: String,
}

/// Client-side login state.
///
/// With a backing file the session survives restarts of the client until
/// [`Session::logout`] removes it; without one it lasts as long as the process.
/// Nothing here is enforced by the server.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    file: Option<PathBuf>,
}

/// Login input is trimmed and lowercased before it is sent.
#[must_use]
pub fn normalize_username(input: &str) -> String {
    input.trim().to_lowercase()
}

impl Session {
    #[must_use]
    pub const fn new(file: Option<PathBuf>) -> Self {
        Self { state: SessionState::LoggedOut, file }
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        match &self.state {
            SessionState::LoggedIn { user } => Some(&user.username),
            SessionState::LoggedOut => None,
        }
    }

    /// Logs in with user input, persisting the session on success.
    ///
    /// # Errors
    /// Returns `ClientError::Invalid` for blank input and `ClientError::Denied`
    /// if the server does not admit the name.
    pub async fn login(&mut self, client: &ChatClient, input: &str) -> Result<User> {
        let username = normalize_username(input);
        if username.is_empty() {
            return Err(ClientError::Invalid("Please enter a username".to_string()));
        }

        let user = client.login(&username).await?;
        self.persist(&user.username).await;
        self.state = SessionState::LoggedIn { user: user.clone() };
        Ok(user)
    }

    /// Restores a previously persisted session. The stored name is re-admitted
    /// through the server; a name that is no longer allowed clears the file.
    ///
    /// # Errors
    /// Returns `ClientError` if the server cannot be reached.
    pub async fn resume(&mut self, client: &ChatClient) -> Result<bool> {
        let Some(username) = self.remembered_username().await else {
            return Ok(false);
        };

        match self.login(client, &username).await {
            Ok(_) => Ok(true),
            Err(ClientError::Denied(_) | ClientError::Invalid(_)) => {
                tracing::info!(%username, "stored session is no longer admitted");
                self.logout().await;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Returns to `LoggedOut` and forgets the persisted session.
    pub async fn logout(&mut self) {
        self.state = SessionState::LoggedOut;
        if let Some(path) = &self.file {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(error = %e, path = %path.display(), "Failed to remove session file"),
            }
        }
    }

    /// The username stored in the session file, if any.
    pub async fn remembered_username(&self) -> Option<String> {
        let path = self.file.as_ref()?;
        let raw = tokio::fs::read(path).await.ok()?;
        match serde_json::from_slice::<StoredSession>(&raw) {
            Ok(stored) => Some(stored.username),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Ignoring unreadable session file");
                None
            }
        }
    }

    async fn persist(&self, username: &str) {
        let Some(path) = &self.file else {
            return;
        };

        let body = match serde_json::to_vec(&StoredSession { username: username.to_string() }) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode session");
                return;
            }
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            tracing::warn!(error = %e, path = %parent.display(), "Failed to create session directory");
            return;
        }

        if let Err(e) = tokio::fs::write(path, body).await {
            tracing::warn!(error = %e, path = %path.display(), "Failed to persist session");
        }
    }
}
