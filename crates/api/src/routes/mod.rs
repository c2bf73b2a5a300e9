//! API route definitions.
//!
//! Authentication is handled upstream; acting users travel in request
//! bodies.

use axum::Router;

use crate::AppState;

pub mod approvals;
pub mod categories;
pub mod details;
pub mod forecast;
pub mod health;
pub mod variance;
pub mod versions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(categories::routes())
        .merge(forecast::routes())
        .merge(versions::routes())
        .merge(details::routes())
        .merge(approvals::routes())
        .merge(variance::routes())
}
