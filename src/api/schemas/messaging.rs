use crate::api::extract::InvalidBody;
use crate::domain::message::Message;
use crate::services::chat_service::INVALID_MESSAGE_DATA;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub sender: String,
    pub text: String,
}

impl InvalidBody for SendMessage {
    const MESSAGE: &'static str = INVALID_MESSAGE_DATA;
}

#[derive(Debug, Serialize)]
pub struct MessageList {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct SentMessage {
    pub message: Message,
}

/// Plain confirmation body, e.g. after clearing the conversation.
#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub message: &'static str,
}
