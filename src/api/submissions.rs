use crate::api::AppState;
use crate::api::schemas::submissions::{LocalSubmissionList, SubmissionResponse};
use crate::config::DeployMode;
use crate::domain::locale::Locale;
use crate::domain::submission::Rejection;
use crate::error::{AppError, Result};
use axum::extract::rejection::JsonRejection;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::Value;

fn locale_of(headers: &HeaderMap) -> Locale {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(Locale::from_accept_language)
        .unwrap_or_default()
}

/// Accepts a signup or consultation form.
///
/// The body is taken as untyped JSON; anything that is not a JSON object is
/// answered with the same structured rejection as a schema failure.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Submission body is not JSON");
            Value::Null
        }
    };

    let result = state.orchestrator.submit(&payload, locale_of(&headers)).await;

    let status = match result.rejection {
        None => StatusCode::OK,
        Some(Rejection::Validation | Rejection::InvalidHandle) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(Rejection::Persistence | Rejection::Unexpected) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(SubmissionResponse::from(result)))
}

/// Lists submissions kept by a preview deployment.
///
/// # Errors
/// Returns `AppError::NotFound` outside preview mode and `AppError::Storage`
/// if the store cannot be read.
pub async fn list_local(State(state): State<AppState>) -> Result<impl IntoResponse> {
    if state.config.mode != DeployMode::Preview {
        return Err(AppError::NotFound);
    }
    let submissions = state.local_store.list().await?;
    Ok(Json(LocalSubmissionList { submissions: submissions.into_iter().map(Into::into).collect() }))
}

/// Clears the preview submission store.
///
/// # Errors
/// Returns `AppError::NotFound` outside preview mode and `AppError::Storage`
/// if the store cannot be rewritten.
pub async fn clear_local(State(state): State<AppState>) -> Result<impl IntoResponse> {
    if state.config.mode != DeployMode::Preview {
        return Err(AppError::NotFound);
    }
    let removed = state.local_store.clear().await?;
    tracing::info!(removed, "Local submissions cleared");
    Ok(StatusCode::NO_CONTENT)
}
