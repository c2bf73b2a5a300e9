//! Variance repository.
//!
//! Joins a version's plan rows with ledger actuals fetched per leaf
//! category and hands both to `VarianceEngine`.

use std::collections::HashMap;
use std::sync::Arc;

use budgetwise_core::category::{CategoryFilter, CategoryTree};
use budgetwise_core::plan::PlanService;
use budgetwise_core::variance::{AlertThresholds, VarianceEngine, VarianceError, VarianceReport};
use budgetwise_shared::types::{BudgetVersionId, CategoryId, MonthlyAmounts};
use tracing::info;

use crate::ports::{ActualsSource, CategorySource};
use crate::store::MemoryStore;

/// Variance repository.
#[derive(Clone)]
pub struct VarianceRepository {
    store: MemoryStore,
    categories: Arc<dyn CategorySource>,
    actuals: Arc<dyn ActualsSource>,
    thresholds: AlertThresholds,
}

impl std::fmt::Debug for VarianceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VarianceRepository")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

impl VarianceRepository {
    /// Creates a variance repository.
    #[must_use]
    pub fn new(
        store: MemoryStore,
        categories: Arc<dyn CategorySource>,
        actuals: Arc<dyn ActualsSource>,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            store,
            categories,
            actuals,
            thresholds,
        }
    }

    /// Thresholds used when a report does not override them.
    #[must_use]
    pub const fn thresholds(&self) -> AlertThresholds {
        self.thresholds
    }

    /// Planned versus actual for every category of an approved version.
    ///
    /// Actuals are read for the version's year.
    ///
    /// # Errors
    ///
    /// - `VarianceError::VersionNotFound` if the version does not exist
    /// - `VarianceError::VersionNotApproved` unless `APPROVED` or `ARCHIVED`
    /// - `VarianceError::Source` if a source fails
    /// - `VarianceError::Hierarchy` if the category list is inconsistent
    pub async fn report(
        &self,
        version_id: BudgetVersionId,
        thresholds: Option<AlertThresholds>,
    ) -> Result<VarianceReport, VarianceError> {
        let (version, details) = {
            let tables = self.store.read().await;
            let version = tables
                .versions
                .get(&version_id)
                .cloned()
                .ok_or(VarianceError::VersionNotFound(version_id))?;
            (version, tables.details_of(version_id))
        };
        VarianceEngine::ensure_reportable(version.id, version.status)?;

        let categories = self
            .categories
            .list_categories(CategoryFilter::default())
            .await?;
        let tree = CategoryTree::build(categories)?;
        let planned = PlanService::monthly_values(&details);
        let actual = self.leaf_actuals(&tree, version.year).await?;

        let thresholds = thresholds.unwrap_or(self.thresholds);
        let report = VarianceEngine::report(&tree, &planned, &actual, &thresholds);

        info!(
            version_id = %version_id,
            year = version.year,
            planned = %report.totals.planned,
            actual = %report.totals.actual,
            alert = %report.alert,
            "Variance report built"
        );
        Ok(report)
    }

    async fn leaf_actuals(
        &self,
        tree: &CategoryTree,
        year: i32,
    ) -> Result<HashMap<CategoryId, MonthlyAmounts>, VarianceError> {
        let mut actual = HashMap::new();
        for leaf in tree.leaves() {
            let mut monthly = MonthlyAmounts::ZERO;
            for row in self.actuals.list_actuals(leaf, year).await? {
                monthly[row.month] += row.amount;
            }
            actual.insert(leaf, monthly);
        }
        Ok(actual)
    }
}
