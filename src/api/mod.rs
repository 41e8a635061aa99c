use crate::adapters::local_store::LocalSubmissionStore;
use crate::api::rate_limit::log_rate_limit_events;
use crate::config::Config;
use crate::services::health_service::HealthService;
use crate::services::orchestrator::SubmissionOrchestrator;
use crate::services::rate_limit_service::RateLimitService;
use axum::body::Body;
use axum::http::Request;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod health;
pub mod middleware;
pub mod rate_limit;
pub mod schemas;
pub mod submissions;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: SubmissionOrchestrator,
    pub local_store: Arc<LocalSubmissionStore>,
    pub rate_limit_service: RateLimitService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub orchestrator: SubmissionOrchestrator,
    pub local_store: Arc<LocalSubmissionStore>,
    pub rate_limit_service: RateLimitService,
}

/// Configures and returns the public application router.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(config: Config, services: ServiceContainer) -> Router {
    let interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let submit_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(interval_ns))
            .burst_size(config.rate_limit.burst.max(1))
            .key_extractor(services.rate_limit_service.extractor.clone())
            .finish()
            .expect("Failed to build submission rate limiter config"),
    );

    let state = AppState {
        config,
        orchestrator: services.orchestrator,
        local_store: services.local_store,
        rate_limit_service: services.rate_limit_service,
    };

    // Form posts are throttled per client; the local store routes are not.
    let submit_routes = Router::new()
        .route("/submissions", post(submissions::submit))
        .layer(GovernorLayer::new(submit_conf))
        .layer(from_fn_with_state(state.clone(), log_rate_limit_events));

    let local_routes = Router::new()
        .route("/submissions/local", get(submissions::list_local).delete(submissions::clear_local));

    Router::new()
        .nest("/v1", submit_routes.merge(local_routes))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
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
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
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
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
