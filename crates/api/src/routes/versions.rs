//! Budget version routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use budgetwise_core::plan::CreateVersionInput;
use budgetwise_shared::types::BudgetVersionId;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Creates the version routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/versions", get(list_versions).post(create_version))
        .route(
            "/versions/{version_id}",
            get(get_version).delete(delete_version),
        )
        .route("/versions/{version_id}/totals", get(get_totals))
        .route("/versions/{version_id}/rollup", get(get_rollup))
}

/// Query for listing versions.
#[derive(Debug, Default, Deserialize)]
pub struct ListVersionsQuery {
    /// Only versions of this year.
    pub year: Option<i32>,
}

/// GET `/versions` - List versions ordered by year and number.
async fn list_versions(
    State(state): State<AppState>,
    Query(query): Query<ListVersionsQuery>,
) -> impl IntoResponse {
    let versions = state.repos.versions.list(query.year).await;
    Json(json!({ "versions": versions }))
}

/// POST `/versions` - Create a draft version, optionally copying another.
async fn create_version(
    State(state): State<AppState>,
    Json(payload): Json<CreateVersionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let version = state.repos.versions.create(payload).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

/// GET `/versions/{version_id}` - Get a version with its stored totals.
async fn get_version(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repos.versions.get(version_id).await?))
}

/// DELETE `/versions/{version_id}` - Delete a draft and its plan rows.
async fn delete_version(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
) -> Result<impl IntoResponse, ApiError> {
    state.repos.versions.delete(version_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/versions/{version_id}/totals` - OPEX/CAPEX/total per month.
async fn get_totals(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repos.details.sum_monthly(version_id).await?))
}

/// GET `/versions/{version_id}/rollup` - Every category with rolled-up amounts.
async fn get_rollup(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.repos.details.roll_up(version_id).await?;
    Ok(Json(json!({ "categories": rows })))
}
