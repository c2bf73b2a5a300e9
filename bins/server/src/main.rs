//! Budgetwise API Server
//!
//! Main entry point for the budget planning service.

use chrono::{Datelike, Utc};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budgetwise_api::{AppState, create_router};
use budgetwise_db::{MemoryStore, Repositories, seed::seed_demo_data};
use budgetwise_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgetwise=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let repos = Repositories::new(MemoryStore::new(), &config.planning)?;
    info!(
        currency = ?config.planning.currency,
        warning_threshold = %config.planning.warning_threshold,
        critical_threshold = %config.planning.critical_threshold,
        "Repositories ready"
    );

    if config.planning.seed_demo_data {
        let summary = seed_demo_data(&repos, Utc::now().year()).await?;
        info!(
            categories = summary.categories,
            actual_rows = summary.actual_rows,
            "Demo data seeded"
        );
    }

    let state = AppState::new(repos);
    let shutdown = state.shutdown.clone();
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
