use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use runboard_api::WorkflowRunsResponse;
use runboard_github::ActionsBackend;

use crate::error::{
    ApiResult,
    AppError,
};
use crate::state::AppState;

fn backend(state: &AppState) -> ApiResult<Arc<dyn ActionsBackend>> {
    state.backend.clone().ok_or_else(|| {
        AppError::not_configured(state.config_error.as_deref().unwrap_or("unknown error"))
    })
}

pub async fn list_runs(State(state): State<AppState>) -> ApiResult<Json<WorkflowRunsResponse>> {
    let runs = backend(&state)?.list_runs().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to list workflow runs");
        AppError::from(e)
    })?;

    tracing::debug!(count = runs.len(), "Listed workflow runs");
    Ok(Json(runs))
}

/// Answers 201 with an empty body once GitHub accepted the event
pub async fn trigger_run(State(state): State<AppState>) -> ApiResult<StatusCode> {
    backend(&state)?.dispatch().await.map_err(|e| {
        tracing::warn!(
            status = e.http_status(),
            error = %e,
            "Workflow dispatch rejected"
        );
        AppError::from(e)
    })?;

    tracing::info!("Workflow dispatch accepted");
    Ok(StatusCode::CREATED)
}
