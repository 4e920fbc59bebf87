use crate::error::AppError;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// Request bodies that answer any malformed payload with one fixed message.
pub trait InvalidBody {
    const MESSAGE: &'static str;
}

/// JSON body extractor that reports every malformed body as a 400.
///
/// Axum's own `Json` answers 415 for a missing content type and 422 for a
/// well-formed body with missing or mistyped fields. The deserializer's detail
/// is logged, never returned.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + InvalidBody,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
                Err(AppError::BadRequest(T::MESSAGE.to_string()))
            }
        }
    }
}
