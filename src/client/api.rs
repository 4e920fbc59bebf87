use crate::domain::message::Message;
use crate::domain::user::User;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Denied(String),
    #[error("{0}")]
    Invalid(String),
    #[error("server error ({status}): {message}")]
    Server { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct MessagesEnvelope {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: Message,
}

#[derive(Deserialize)]
struct Confirmation {
    message: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
}

#[derive(Serialize)]
struct SendBody<'a> {
    sender: &'a str,
    text: &'a str,
}

/// HTTP client for the chat API.
#[derive(Clone, Debug)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// # Errors
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// # Errors
    /// Returns `ClientError::Denied` if the name is not admitted to the chat.
    pub async fn login(&self, username: &str) -> Result<User> {
        let resp = self.http.post(self.url("/api/login")).json(&LoginBody { username }).send().await?;
        Ok(decode::<UserEnvelope>(resp).await?.user)
    }

    /// # Errors
    /// Returns `ClientError` if the request fails or the server answers with an error.
    pub async fn list_messages(&self) -> Result<Vec<Message>> {
        let resp = self.http.get(self.url("/api/messages")).send().await?;
        Ok(decode::<MessagesEnvelope>(resp).await?.messages)
    }

    /// # Errors
    /// Returns `ClientError::Denied` if the sender is not admitted and
    /// `ClientError::Invalid` if the server rejects the text.
    pub async fn send_message(&self, sender: &str, text: &str) -> Result<Message> {
        let resp = self.http.post(self.url("/api/messages")).json(&SendBody { sender, text }).send().await?;
        Ok(decode::<MessageEnvelope>(resp).await?.message)
    }

    /// Clears the whole conversation and returns the server's confirmation text.
    ///
    /// # Errors
    /// Returns `ClientError` if the request fails or the server answers with an error.
    pub async fn delete_all_messages(&self) -> Result<String> {
        let resp = self.http.delete(self.url("/api/messages")).send().await?;
        Ok(decode::<Confirmation>(resp).await?.message)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
    };

    Err(match status {
        StatusCode::FORBIDDEN => ClientError::Denied(message),
        StatusCode::BAD_REQUEST => ClientError::Invalid(message),
        _ => ClientError::Server { status, message },
    })
}
