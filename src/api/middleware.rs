use crate::api::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Issues a fresh UUID for requests that arrive without an `x-request-id`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Records a rate-limit decision for every response leaving the API.
pub async fn log_rate_limit_events(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let retry_after = response.headers().get("x-ratelimit-after").and_then(|v| v.to_str().ok());
    state.rate_limit_service.log_decision(response.status(), retry_after);
    response
}
