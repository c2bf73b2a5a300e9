//! Category routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use budgetwise_core::category::{CategoryFilter, CreateCategoryInput, UpdateCategoryInput};
use budgetwise_shared::types::CategoryId;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/outline", get(get_outline))
        .route("/categories/{category_id}", put(update_category))
        .route("/categories/{category_id}/baseline", get(get_baseline))
}

/// Query for the baseline endpoint.
#[derive(Debug, Deserialize)]
pub struct BaselineQuery {
    /// Year of actuals to summarise.
    pub year: i32,
}

/// GET `/categories` - List categories, optionally filtered.
async fn list_categories(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> impl IntoResponse {
    let categories = state.repos.categories.list(filter).await;
    Json(json!({ "categories": categories }))
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.repos.categories.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT `/categories/{category_id}` - Rename, move, or (de)activate.
async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
    Json(payload): Json<UpdateCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.repos.categories.update(category_id, payload).await?;
    Ok(Json(category))
}

/// GET `/categories/outline` - Pre-order listing with depth and leaf flags.
async fn get_outline(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let outline = state.repos.categories.outline().await?;
    Ok(Json(json!({ "outline": outline })))
}

/// GET `/categories/{category_id}/baseline?year=` - Actuals summary.
async fn get_baseline(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
    Query(query): Query<BaselineQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let baseline = state.repos.forecast.baseline(category_id, query.year).await?;
    Ok(Json(baseline))
}
