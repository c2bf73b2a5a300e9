//! Plan detail routes.
//!
//! Single upserts are written immediately; the batch endpoint applies a
//! whole edit log all-or-nothing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use budgetwise_core::plan::{EditLog, UpsertPlanDetailInput};
use budgetwise_shared::types::{BudgetVersionId, PlanDetailId, UserId};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Creates the plan detail routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/versions/{version_id}/details",
            get(list_details).put(upsert_detail),
        )
        .route(
            "/versions/{version_id}/details/{detail_id}",
            delete(delete_detail),
        )
        .route("/versions/{version_id}/details/batch", post(save_batch))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for a single upsert.
#[derive(Debug, Deserialize)]
pub struct UpsertDetailRequest {
    /// Acting user.
    pub actor: UserId,
    /// The amount to write.
    pub detail: UpsertPlanDetailInput,
}

/// Request body for saving an edit log.
#[derive(Debug, Deserialize)]
pub struct SaveBatchRequest {
    /// Acting user.
    pub actor: UserId,
    /// Pending edits in order.
    pub commands: EditLog,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/versions/{version_id}/details` - All rows of a version.
async fn list_details(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state.repos.details.get_by_version(version_id).await?;
    Ok(Json(json!({ "details": details })))
}

/// PUT `/versions/{version_id}/details` - Insert or update one amount.
async fn upsert_detail(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<UpsertDetailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state
        .repos
        .details
        .upsert(version_id, &payload.detail, payload.actor)
        .await?;
    Ok(Json(detail))
}

/// DELETE `/versions/{version_id}/details/{detail_id}` - Remove one row.
async fn delete_detail(
    State(state): State<AppState>,
    Path((version_id, detail_id)): Path<(BudgetVersionId, PlanDetailId)>,
) -> Result<impl IntoResponse, ApiError> {
    state.repos.details.delete(version_id, detail_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/versions/{version_id}/details/batch` - Save an edit log.
///
/// Responds 200 with the bulk result even when a command fails; in that
/// case nothing was written.
async fn save_batch(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<SaveBatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .repos
        .details
        .save_edits(version_id, &payload.commands, payload.actor)
        .await?;
    Ok(Json(result))
}
