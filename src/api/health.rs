use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use crate::config::DeployMode;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe. Production needs at least one configured email provider;
/// preview needs a readable local store.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let health = &state.health_service;
    let mode = health.mode();

    let providers = health.check_providers();
    let any_configured = providers.iter().any(|(_, configured)| *configured);

    let mut status_code = StatusCode::OK;
    if mode == DeployMode::Production && !any_configured {
        tracing::warn!(component = "email", "Readiness probe failed: no email provider configured");
        status_code = StatusCode::SERVICE_UNAVAILABLE;
    }

    let local_store = match mode {
        DeployMode::Production => "disabled",
        DeployMode::Preview => {
            if let Err(e) = health.check_local_store().await {
                tracing::warn!(error = %e, component = "local_store", "Readiness probe failed");
                status_code = StatusCode::SERVICE_UNAVAILABLE;
                "error"
            } else {
                "ok"
            }
        }
    };

    let response = HealthResponse {
        status: if status_code == StatusCode::OK { "ok" } else { "error" }.to_string(),
        mode: mode.to_string(),
        providers: providers
            .into_iter()
            .map(|(name, configured)| (name.to_string(), if configured { "configured" } else { "missing" }.to_string()))
            .collect(),
        local_store: local_store.to_string(),
    };

    (status_code, Json(response))
}
