use crate::api::extract::InvalidBody;
use crate::domain::user::User;
use crate::services::chat_service::INVALID_USERNAME;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Login {
    pub username: String,
}

impl InvalidBody for Login {
    const MESSAGE: &'static str = INVALID_USERNAME;
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
}
