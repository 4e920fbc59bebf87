use crate::config::Config;
use crate::services::chat_service::ChatService;
use crate::services::health_service::HealthService;
use crate::services::rate_limit_service::RateLimitService;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::{Router, middleware::from_fn_with_state, routing::get, routing::post};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod extract;
pub mod health;
pub mod messages;
pub mod middleware;
pub mod schemas;
pub mod ui;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct AppState {
    pub chat_service: ChatService,
    pub rate_limit_service: RateLimitService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub chat_service: ChatService,
    pub rate_limit_service: RateLimitService,
}

/// Configures and returns the public router: the browser UI and the chat API.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(config: &Config, services: ServiceContainer) -> Router {
    let std_interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let standard_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(std_interval_ns))
            .burst_size(config.rate_limit.burst.max(1))
            .key_extractor(services.rate_limit_service.extractor.clone())
            .finish()
            .expect("Failed to build standard rate limiter config"),
    );

    let login_interval_ns = 1_000_000_000 / config.rate_limit.login_per_second.max(1);
    let login_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(login_interval_ns))
            .burst_size(config.rate_limit.login_burst.max(1))
            .key_extractor(services.rate_limit_service.extractor.clone())
            .finish()
            .expect("Failed to build login rate limiter config"),
    );

    let state =
        AppState { chat_service: services.chat_service, rate_limit_service: services.rate_limit_service };

    let login_routes = Router::new().route("/login", post(auth::login)).layer(GovernorLayer::new(login_conf));

    let message_routes = Router::new()
        .route(
            "/messages",
            get(messages::list_messages).post(messages::send_message).delete(messages::delete_all_messages),
        )
        .layer(GovernorLayer::new(standard_conf));

    Router::new()
        .route("/", get(ui::index))
        .nest("/api", login_routes.merge(message_routes))
        .layer(from_fn_with_state(state.clone(), middleware::log_rate_limit_events))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .and_then(|id| id.header_value().to_str().ok())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        let status = response.status();
                        span.record("http.response.status_code", status.as_u16());

                        tracing::debug!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), middleware::MakeRequestUuid))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
