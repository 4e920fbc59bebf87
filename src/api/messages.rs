use crate::api::AppState;
use crate::api::extract::JsonBody;
use crate::api::schemas::messaging::{Confirmation, MessageList, SendMessage, SentMessage};
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let messages = state.chat_service.list_messages().await?;
    Ok(Json(MessageList { messages }))
}

/// Appends a message to the conversation.
///
/// # Errors
/// Returns `AppError::BadRequest` if the body is malformed or the text is blank.
/// Returns `AppError::Forbidden` if the sender is not allow-listed.
pub async fn send_message(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SendMessage>,
) -> Result<impl IntoResponse> {
    let message = state.chat_service.send_message(payload.sender, payload.text).await?;
    Ok(Json(SentMessage { message }))
}

// Clearing is not tied to an identity; any caller that can reach the API may do it.
pub async fn delete_all_messages(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.chat_service.delete_all_messages().await?;
    Ok(Json(Confirmation { message: "All messages deleted" }))
}
