//! Approval workflow routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use budgetwise_db::repositories::TransitionInput;
use budgetwise_shared::types::BudgetVersionId;
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Creates the workflow routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/versions/{version_id}/submit", post(submit))
        .route("/versions/{version_id}/approve", post(approve))
        .route("/versions/{version_id}/reject", post(reject))
        .route("/versions/{version_id}/request-changes", post(request_changes))
        .route("/versions/{version_id}/archive", post(archive))
        .route("/versions/{version_id}/approvals", get(list_approvals))
}

/// POST `/versions/{version_id}/submit` - Send for review.
async fn submit(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<TransitionInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repos.workflow.submit(version_id, payload).await?))
}

/// POST `/versions/{version_id}/approve` - Approve the version under review.
async fn approve(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<TransitionInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repos.workflow.approve(version_id, payload).await?))
}

/// POST `/versions/{version_id}/reject` - Reject; comments required.
async fn reject(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<TransitionInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repos.workflow.reject(version_id, payload).await?))
}

/// POST `/versions/{version_id}/request-changes` - Return for revision;
/// comments required.
async fn request_changes(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<TransitionInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.repos.workflow.request_changes(version_id, payload).await?,
    ))
}

/// POST `/versions/{version_id}/archive` - Archive a decided version.
async fn archive(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<TransitionInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repos.workflow.archive(version_id, payload).await?))
}

/// GET `/versions/{version_id}/approvals` - The approval log, oldest first.
async fn list_approvals(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.repos.workflow.history(version_id).await?;
    Ok(Json(json!({ "approvals": entries })))
}
