//! Persistence layer for Budgetwise.
//!
//! This crate provides:
//! - `MemoryStore`, the in-memory tables behind an async lock
//! - The category and actuals source ports
//! - Repositories that apply `budgetwise-core` rules to the store
//! - Demo data seeding

pub mod ports;
pub mod repositories;
pub mod seed;
pub mod store;

use std::sync::Arc;

use budgetwise_core::forecast::BaselineCache;
use budgetwise_core::variance::{AlertThresholds, VarianceError};
use budgetwise_shared::PlanningConfig;

pub use ports::{ActualsSource, CategorySource, SourceError};
pub use repositories::{
    CategoryRepository, ForecastRepository, PlanDetailRepository, VarianceRepository,
    VersionRepository, WorkflowRepository,
};
pub use store::MemoryStore;

/// Every repository over one store.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Shared store.
    pub store: MemoryStore,
    /// Categories.
    pub categories: CategoryRepository,
    /// Budget versions.
    pub versions: VersionRepository,
    /// Plan rows.
    pub details: PlanDetailRepository,
    /// Approval transitions.
    pub workflow: WorkflowRepository,
    /// Baselines and forecasts.
    pub forecast: ForecastRepository,
    /// Variance reports.
    pub variance: VarianceRepository,
}

impl Repositories {
    /// Wires every repository to `store`, which also serves as the
    /// category and actuals source.
    ///
    /// # Errors
    ///
    /// Returns `VarianceError::InvalidThresholds` if the configured alert
    /// thresholds are inconsistent.
    pub fn new(store: MemoryStore, config: &PlanningConfig) -> Result<Self, VarianceError> {
        let source = Arc::new(store.clone());
        Self::with_sources(store, source.clone(), source, config)
    }

    /// Wires every repository to `store` with external sources.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn with_sources(
        store: MemoryStore,
        categories: Arc<dyn CategorySource>,
        actuals: Arc<dyn ActualsSource>,
        config: &PlanningConfig,
    ) -> Result<Self, VarianceError> {
        let thresholds = AlertThresholds::new(config.warning_threshold, config.critical_threshold)?;
        let details = PlanDetailRepository::new(store.clone());
        let cache = BaselineCache::with_config(
            config.baseline_cache_capacity,
            config.baseline_cache_ttl_secs,
        );

        Ok(Self {
            categories: CategoryRepository::new(store.clone()),
            versions: VersionRepository::new(store.clone(), config.currency),
            workflow: WorkflowRepository::new(store.clone()),
            forecast: ForecastRepository::new(actuals.clone(), cache, details.clone()),
            variance: VarianceRepository::new(store.clone(), categories, actuals, thresholds),
            details,
            store,
        })
    }
}
