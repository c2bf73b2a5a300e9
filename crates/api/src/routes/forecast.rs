//! Forecast routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use budgetwise_core::forecast::{CalculationResult, ForecastRequest};
use budgetwise_core::plan::BulkResult;
use budgetwise_shared::types::{BudgetVersionId, UserId};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Creates the forecast routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forecast/calculate", post(calculate))
        .route("/versions/{version_id}/forecast", post(apply_forecast))
        .route("/versions/{version_id}/baseline-load", post(load_baselines))
}

/// Request body for calculating and applying one forecast.
#[derive(Debug, Deserialize)]
pub struct ApplyForecastRequest {
    /// Acting user.
    pub actor: UserId,
    /// What to forecast.
    pub request: ForecastRequest,
}

/// Response for an applied forecast.
#[derive(Debug, Serialize)]
pub struct ApplyForecastResponse {
    /// The unrounded calculation.
    pub calculation: CalculationResult,
    /// Outcome of the twelve monthly writes.
    pub result: BulkResult,
}

/// Request body for a bulk baseline load.
#[derive(Debug, Deserialize)]
pub struct LoadBaselinesRequest {
    /// Acting user.
    pub actor: UserId,
    /// One request per category.
    pub requests: Vec<ForecastRequest>,
}

/// POST `/forecast/calculate` - Preview a forecast without writing.
async fn calculate(
    State(state): State<AppState>,
    Json(payload): Json<ForecastRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repos.forecast.calculate(&payload).await?))
}

/// POST `/versions/{version_id}/forecast` - Calculate and write one category.
async fn apply_forecast(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<ApplyForecastRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let calculation = state.repos.forecast.calculate(&payload.request).await?;
    let result = state
        .repos
        .details
        .apply_calculation(version_id, &calculation, payload.actor)
        .await?;
    Ok(Json(ApplyForecastResponse {
        calculation,
        result,
    }))
}

/// POST `/versions/{version_id}/baseline-load` - Forecast many categories.
///
/// Stops issuing writes once the server starts shutting down.
async fn load_baselines(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Json(payload): Json<LoadBaselinesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cancel = state.shutdown.child_token();
    let result = state
        .repos
        .forecast
        .load_baselines(version_id, &payload.requests, payload.actor, &cancel)
        .await?;
    Ok(Json(result))
}
