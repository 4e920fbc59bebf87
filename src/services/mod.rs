pub mod chat_service;
pub mod health_service;
pub mod rate_limit_service;
