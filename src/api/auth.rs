use crate::api::AppState;
use crate::api::extract::JsonBody;
use crate::api::schemas::auth::{Login, LoginResponse};
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn login(State(state): State<AppState>, JsonBody(payload): JsonBody<Login>) -> Result<impl IntoResponse> {
    let user = state.chat_service.login(&payload.username).await?;
    Ok(Json(LoginResponse { user }))
}
