//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the `budgetwise-db` repositories
//! - `ApiError`, which renders every domain error as JSON

pub mod error;
pub mod routes;

use axum::Router;
use budgetwise_db::Repositories;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repositories over the shared store.
    pub repos: Repositories,
    /// Cancelled when the server shuts down; long bulk loads stop early.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// State with a fresh shutdown token.
    #[must_use]
    pub fn new(repos: Repositories) -> Self {
        Self {
            repos,
            shutdown: CancellationToken::new(),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
