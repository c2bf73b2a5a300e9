//! Forecast repository: baselines from the actuals source, cached.

use std::sync::Arc;

use budgetwise_core::forecast::{
    BaselineCache, BaselineSummary, CalculationResult, ForecastCalculator, ForecastError,
    ForecastRequest,
};
use budgetwise_core::plan::{BulkFailure, BulkResult, PlanError};
use budgetwise_shared::types::{BudgetVersionId, CategoryId, UserId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ports::ActualsSource;
use crate::repositories::plan_detail::PlanDetailRepository;

/// Forecast repository.
#[derive(Clone)]
pub struct ForecastRepository {
    actuals: Arc<dyn ActualsSource>,
    cache: BaselineCache,
    details: PlanDetailRepository,
}

impl std::fmt::Debug for ForecastRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastRepository")
            .field("cache", &self.cache)
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}

impl ForecastRepository {
    /// Creates a forecast repository over an actuals source.
    #[must_use]
    pub fn new(
        actuals: Arc<dyn ActualsSource>,
        cache: BaselineCache,
        details: PlanDetailRepository,
    ) -> Self {
        Self {
            actuals,
            cache,
            details,
        }
    }

    /// Baseline of one category and year, served from cache when present.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::Source` if the actuals source fails.
    pub async fn baseline(
        &self,
        category_id: CategoryId,
        year: i32,
    ) -> Result<BaselineSummary, ForecastError> {
        if let Some(summary) = self.cache.get(category_id, year) {
            debug!(category_id = %category_id, year, "Baseline cache hit");
            return Ok(summary);
        }

        let rows = self.actuals.list_actuals(category_id, year).await?;
        let summary = ForecastCalculator::baseline(category_id, year, &rows);
        self.cache.insert(summary);
        debug!(
            category_id = %category_id,
            year,
            rows = rows.len(),
            total = %summary.total,
            "Baseline loaded"
        );
        Ok(summary)
    }

    /// Drops a cached baseline after its actuals changed.
    pub fn invalidate_baseline(&self, category_id: CategoryId, year: i32) {
        self.cache.invalidate(category_id, year);
    }

    /// Calculates a forecast from the request's base-year baseline.
    ///
    /// # Errors
    ///
    /// - `ForecastError::Source` if the actuals source fails
    /// - `ForecastError::DivisionByZero` / `InvalidParameter` from the method
    pub async fn calculate(
        &self,
        request: &ForecastRequest,
    ) -> Result<CalculationResult, ForecastError> {
        let baseline = self.baseline(request.category_id, request.base_year()).await?;
        ForecastCalculator::calculate(request, &baseline)
    }

    /// Calculates and writes a forecast for each request into a version.
    ///
    /// Categories are independent: a failing one is reported and the rest
    /// continue. Once `cancel` fires no further category is written and the
    /// result is marked cancelled.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::VersionNotFound` or `VersionLocked` before any
    /// category is processed.
    pub async fn load_baselines(
        &self,
        version_id: BudgetVersionId,
        requests: &[ForecastRequest],
        actor: UserId,
        cancel: &CancellationToken,
    ) -> Result<BulkResult, PlanError> {
        self.details.ensure_editable(version_id).await?;

        let mut outcome = BulkResult::default();
        for (position, request) in requests.iter().enumerate() {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                warn!(
                    version_id = %version_id,
                    processed = position,
                    remaining = requests.len() - position,
                    "Baseline load cancelled"
                );
                break;
            }

            let item = format!("category {}", request.category_id);
            let result = match self.calculate(request).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(category_id = %request.category_id, error = %err, "Forecast failed");
                    outcome.failures.push(BulkFailure::new(item, err));
                    continue;
                }
            };

            let written = match self.details.apply_calculation(version_id, &result, actor).await {
                Ok(written) => written,
                Err(err) => {
                    warn!(category_id = %request.category_id, error = %err, "Forecast write failed");
                    outcome.failures.push(BulkFailure::new(item, err));
                    continue;
                }
            };

            if written.failures.is_empty() {
                outcome.success_count += 1;
            } else {
                outcome.failures.extend(written.failures.into_iter().map(|f| BulkFailure {
                    item: format!("{item}, {}", f.item),
                    ..f
                }));
            }
        }

        info!(
            version_id = %version_id,
            requested = requests.len(),
            succeeded = outcome.success_count,
            failed = outcome.failures.len(),
            cancelled = outcome.cancelled,
            "Baseline load finished"
        );
        Ok(outcome)
    }
}
