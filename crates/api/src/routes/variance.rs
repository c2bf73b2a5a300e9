//! Variance report route.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use budgetwise_core::variance::AlertThresholds;
use budgetwise_shared::types::BudgetVersionId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Creates the variance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/versions/{version_id}/variance", get(get_variance))
}

/// Optional threshold overrides. A missing bound keeps the configured one.
#[derive(Debug, Default, Deserialize)]
pub struct VarianceQuery {
    /// Warning threshold percent.
    pub warning: Option<Decimal>,
    /// Critical threshold percent.
    pub critical: Option<Decimal>,
}

/// GET `/versions/{version_id}/variance` - Planned versus actual report.
async fn get_variance(
    State(state): State<AppState>,
    Path(version_id): Path<BudgetVersionId>,
    Query(query): Query<VarianceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let variance = &state.repos.variance;
    let thresholds = if query.warning.is_none() && query.critical.is_none() {
        None
    } else {
        let configured = variance.thresholds();
        Some(AlertThresholds::new(
            query.warning.unwrap_or(configured.warning()),
            query.critical.unwrap_or(configured.critical()),
        )?)
    };
    Ok(Json(variance.report(version_id, thresholds).await?))
}
