//! Plan detail repository.
//!
//! Every write validates against the version status and a category
//! snapshot taken inside the same write lock, then writes. Aggregates are
//! never recomputed here; see `VersionRepository::refresh_totals`.

use budgetwise_core::category::CategoryType;
use budgetwise_core::forecast::CalculationResult;
use budgetwise_core::plan::{
    BudgetVersion, BulkFailure, BulkResult, CalculationMethod, EditLog, PlanDetail, PlanError,
    PlanService, PlanTotals, UpsertPlanDetailInput,
};
use budgetwise_shared::types::{
    BudgetVersionId, CategoryId, Month, MonthlyAmounts, PlanDetailId, UserId,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::store::MemoryStore;

/// One category of a version's roll-up, in outline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollUpRow {
    /// Category ID.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// OPEX or CAPEX.
    pub category_type: CategoryType,
    /// Resolved parent.
    pub parent_id: Option<CategoryId>,
    /// Depth in the outline.
    pub depth: usize,
    /// Whether the category holds plan rows directly.
    pub is_leaf: bool,
    /// Monthly sums over descendant leaves.
    pub monthly: MonthlyAmounts,
    /// Annual sum.
    pub total: Decimal,
}

/// Plan detail repository.
#[derive(Debug, Clone)]
pub struct PlanDetailRepository {
    store: MemoryStore,
}

impl PlanDetailRepository {
    /// Creates a new plan detail repository.
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Inserts or updates the row for (version, category, month).
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionNotFound` if the version does not exist
    /// - `PlanError::VersionLocked` unless the version is editable
    /// - `PlanError::InvalidMonth`, `NegativeAmount`, `CategoryNotFound`,
    ///   `NotLeaf` for an invalid entry
    pub async fn upsert(
        &self,
        version_id: BudgetVersionId,
        input: &UpsertPlanDetailInput,
        actor: UserId,
    ) -> Result<PlanDetail, PlanError> {
        let mut tables = self.store.write().await;
        let version = tables
            .versions
            .get(&version_id)
            .ok_or(PlanError::VersionNotFound(version_id))?;
        let tree = tables.tree()?;
        let edit = PlanService::validate_upsert(version, &tree, input)?;

        let row = tables
            .apply(version_id, edit, actor, Utc::now())
            .ok_or_else(|| PlanError::CategoryNotFound(input.category_id))?;

        info!(
            version_id = %version_id,
            category_id = %row.category_id,
            month = row.month.number(),
            amount = %row.amount,
            "Plan detail saved"
        );
        Ok(row)
    }

    /// Returns the version if its plan may be edited.
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionNotFound` if the version does not exist
    /// - `PlanError::VersionLocked` unless the version is editable
    pub async fn ensure_editable(
        &self,
        version_id: BudgetVersionId,
    ) -> Result<BudgetVersion, PlanError> {
        let tables = self.store.read().await;
        let version = tables
            .versions
            .get(&version_id)
            .ok_or(PlanError::VersionNotFound(version_id))?;
        PlanService::ensure_editable(version)?;
        Ok(version.clone())
    }

    /// Rows of a version ordered by category, then month.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::VersionNotFound` if the version does not exist.
    pub async fn get_by_version(
        &self,
        version_id: BudgetVersionId,
    ) -> Result<Vec<PlanDetail>, PlanError> {
        let tables = self.store.read().await;
        if !tables.versions.contains_key(&version_id) {
            return Err(PlanError::VersionNotFound(version_id));
        }
        Ok(tables.details_of(version_id))
    }

    /// Removes one row of an editable version.
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionNotFound` if the version does not exist
    /// - `PlanError::VersionLocked` unless the version is editable
    /// - `PlanError::DetailNotFound` if the row is not part of the version
    pub async fn delete(
        &self,
        version_id: BudgetVersionId,
        detail_id: PlanDetailId,
    ) -> Result<(), PlanError> {
        let mut tables = self.store.write().await;
        let version = tables
            .versions
            .get(&version_id)
            .ok_or(PlanError::VersionNotFound(version_id))?;
        PlanService::ensure_editable(version)?;
        if tables
            .details
            .get(&detail_id)
            .is_none_or(|d| d.version_id != version_id)
        {
            return Err(PlanError::DetailNotFound(detail_id));
        }

        tables.remove_detail(detail_id);
        info!(version_id = %version_id, detail_id = %detail_id, "Plan detail deleted");
        Ok(())
    }

    /// Per-month OPEX, CAPEX and grand totals from leaf rows.
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionNotFound` if the version does not exist
    /// - `PlanError::Hierarchy` if the category snapshot is inconsistent
    pub async fn sum_monthly(&self, version_id: BudgetVersionId) -> Result<PlanTotals, PlanError> {
        let tables = self.store.read().await;
        if !tables.versions.contains_key(&version_id) {
            return Err(PlanError::VersionNotFound(version_id));
        }
        let tree = tables.tree()?;
        Ok(PlanService::sum_monthly(&tables.details_of(version_id), &tree))
    }

    /// Category roll-up of a version in outline order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::sum_monthly`].
    pub async fn roll_up(&self, version_id: BudgetVersionId) -> Result<Vec<RollUpRow>, PlanError> {
        let tables = self.store.read().await;
        if !tables.versions.contains_key(&version_id) {
            return Err(PlanError::VersionNotFound(version_id));
        }
        let tree = tables.tree()?;
        let values = PlanService::monthly_values(&tables.details_of(version_id));
        let rolled = tree.roll_up(&values);

        Ok(tree
            .outline()
            .into_iter()
            .map(|entry| {
                let monthly = rolled.get(&entry.category_id).copied().unwrap_or_default();
                RollUpRow {
                    category_id: entry.category_id,
                    name: entry.name,
                    category_type: entry.category_type,
                    parent_id: entry.parent_id,
                    depth: entry.depth,
                    is_leaf: entry.is_leaf,
                    total: monthly.total(),
                    monthly,
                }
            })
            .collect())
    }

    /// Applies an edit log all-or-nothing.
    ///
    /// Every command is validated before anything is written. If any
    /// command fails, nothing is written and every failure is reported.
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionNotFound` if the version does not exist
    /// - `PlanError::Hierarchy` if the category snapshot is inconsistent
    pub async fn save_edits(
        &self,
        version_id: BudgetVersionId,
        log: &EditLog,
        actor: UserId,
    ) -> Result<BulkResult, PlanError> {
        let mut tables = self.store.write().await;
        let version = tables
            .versions
            .get(&version_id)
            .ok_or(PlanError::VersionNotFound(version_id))?;
        let tree = tables.tree()?;
        let existing = tables.details_of(version_id);

        let edits = match PlanService::validate_edits(version, &tree, log, &existing) {
            Ok(edits) => edits,
            Err(failures) => {
                warn!(
                    version_id = %version_id,
                    commands = log.len(),
                    failures = failures.len(),
                    "Edit log rejected"
                );
                return Ok(BulkResult {
                    success_count: 0,
                    failures,
                    cancelled: false,
                });
            }
        };

        let now = Utc::now();
        let success_count = edits.len();
        for edit in edits {
            tables.apply(version_id, edit, actor, now);
        }

        info!(version_id = %version_id, commands = success_count, "Edit log saved");
        Ok(BulkResult {
            success_count,
            failures: Vec::new(),
            cancelled: false,
        })
    }

    /// Writes a forecast result as twelve independent monthly upserts.
    ///
    /// Months are rounded to the version's currency with the residual in
    /// December. A month that fails validation is reported and the others
    /// are still written.
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionNotFound` if the version does not exist
    /// - `PlanError::VersionLocked` unless the version is editable
    /// - `PlanError::Hierarchy` if the category snapshot is inconsistent
    pub async fn apply_calculation(
        &self,
        version_id: BudgetVersionId,
        result: &CalculationResult,
        actor: UserId,
    ) -> Result<BulkResult, PlanError> {
        let mut tables = self.store.write().await;
        let version = tables
            .versions
            .get(&version_id)
            .ok_or(PlanError::VersionNotFound(version_id))?
            .clone();
        PlanService::ensure_editable(&version)?;
        let tree = tables.tree()?;

        let now = Utc::now();
        let mut outcome = BulkResult::default();
        for (month, amount) in result.rounded_months(version.currency).iter() {
            let input = UpsertPlanDetailInput {
                category_id: result.category_id,
                month: month.number(),
                amount,
                method: result.method,
                based_on_year: based_on_year(result),
            };
            match PlanService::validate_upsert(&version, &tree, &input) {
                Ok(edit) => {
                    tables.apply(version_id, edit, actor, now);
                    outcome.success_count += 1;
                }
                Err(err) => {
                    warn!(
                        version_id = %version_id,
                        category_id = %result.category_id,
                        month = month.number(),
                        error = %err,
                        "Forecast month rejected"
                    );
                    outcome.failures.push(BulkFailure::new(month_label(month), err));
                }
            }
        }

        info!(
            version_id = %version_id,
            category_id = %result.category_id,
            method = %result.method,
            written = outcome.success_count,
            failed = outcome.failures.len(),
            "Forecast applied"
        );
        Ok(outcome)
    }
}

fn based_on_year(result: &CalculationResult) -> Option<i32> {
    (result.method != CalculationMethod::Manual).then_some(result.based_on_year)
}

fn month_label(month: Month) -> String {
    format!("month {}", month.number())
}
