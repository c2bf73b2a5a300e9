//! Budget version repository.

use budgetwise_core::plan::{
    BudgetVersion, CreateVersionInput, PlanDetail, PlanError, PlanService, VersionTotals,
};
use budgetwise_core::workflow::VersionStatus;
use budgetwise_shared::types::{BudgetVersionId, Currency, PlanDetailId};
use chrono::Utc;
use tracing::info;

use crate::store::MemoryStore;

/// Budget version repository.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    store: MemoryStore,
    default_currency: Currency,
}

impl VersionRepository {
    /// Creates a new version repository.
    #[must_use]
    pub const fn new(store: MemoryStore, default_currency: Currency) -> Self {
        Self {
            store,
            default_currency,
        }
    }

    /// Creates a `DRAFT` version numbered one past the year's highest.
    ///
    /// With `copy_from`, the source version's plan rows and totals are
    /// copied into the new version.
    ///
    /// # Errors
    ///
    /// - `PlanError::EmptyName` if the name is blank
    /// - `PlanError::VersionNotFound` if the copy source does not exist
    pub async fn create(&self, input: CreateVersionInput) -> Result<BudgetVersion, PlanError> {
        let name = PlanService::validate_name(&input.name)?;
        let mut tables = self.store.write().await;

        let (totals, source_rows) = match input.copy_from {
            Some(source_id) => {
                let source = tables
                    .versions
                    .get(&source_id)
                    .ok_or(PlanError::VersionNotFound(source_id))?;
                (source.totals, tables.details_of(source_id))
            }
            None => (VersionTotals::default(), Vec::new()),
        };

        let now = Utc::now();
        let version = BudgetVersion {
            id: BudgetVersionId::new(),
            year: input.year,
            version_number: PlanService::next_version_number(tables.versions.values(), input.year),
            name,
            currency: input.currency.unwrap_or(self.default_currency),
            status: VersionStatus::Draft,
            totals,
            review_iteration: 0,
            row_version: 0,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };

        let copied = source_rows.len();
        for row in source_rows {
            let id = PlanDetailId::new();
            tables
                .detail_index
                .insert((version.id, row.category_id, row.month), id);
            tables.details.insert(
                id,
                PlanDetail {
                    id,
                    version_id: version.id,
                    updated_by: input.created_by,
                    updated_at: now,
                    ..row
                },
            );
        }
        tables.versions.insert(version.id, version.clone());

        info!(
            version_id = %version.id,
            year = version.year,
            version_number = version.version_number,
            copied_rows = copied,
            "Budget version created"
        );
        Ok(version)
    }

    /// Gets a version by ID.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::VersionNotFound` if the version does not exist.
    pub async fn get(&self, id: BudgetVersionId) -> Result<BudgetVersion, PlanError> {
        self.store
            .read()
            .await
            .versions
            .get(&id)
            .cloned()
            .ok_or(PlanError::VersionNotFound(id))
    }

    /// Lists versions, optionally of one year, by year then number.
    pub async fn list(&self, year: Option<i32>) -> Vec<BudgetVersion> {
        let mut versions: Vec<BudgetVersion> = self
            .store
            .read()
            .await
            .versions
            .values()
            .filter(|v| year.is_none_or(|y| v.year == y))
            .cloned()
            .collect();
        versions.sort_by_key(|v| (v.year, v.version_number));
        versions
    }

    /// Deletes a `DRAFT` or `REJECTED` version and its plan rows.
    ///
    /// The approval log is kept.
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionNotFound` if the version does not exist
    /// - `PlanError::VersionNotDeletable` in any other status
    pub async fn delete(&self, id: BudgetVersionId) -> Result<(), PlanError> {
        let mut tables = self.store.write().await;
        let version = tables
            .versions
            .get(&id)
            .ok_or(PlanError::VersionNotFound(id))?;
        PlanService::ensure_deletable(version)?;

        tables.versions.remove(&id);
        let removed = tables.remove_details_of(id);

        info!(version_id = %id, removed_rows = removed, "Budget version deleted");
        Ok(())
    }

    /// Recomputes the header totals from the version's leaf rows.
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionNotFound` if the version does not exist
    /// - `PlanError::Hierarchy` if the category snapshot is inconsistent
    pub async fn refresh_totals(&self, id: BudgetVersionId) -> Result<BudgetVersion, PlanError> {
        let mut tables = self.store.write().await;
        if !tables.versions.contains_key(&id) {
            return Err(PlanError::VersionNotFound(id));
        }
        let tree = tables.tree()?;
        let totals = PlanService::sum_monthly(&tables.details_of(id), &tree).version_totals();

        let version = tables
            .versions
            .get_mut(&id)
            .ok_or(PlanError::VersionNotFound(id))?;
        version.totals = totals;
        version.updated_at = Utc::now();

        info!(
            version_id = %id,
            total = %totals.total,
            opex = %totals.opex,
            capex = %totals.capex,
            "Version totals refreshed"
        );
        Ok(version.clone())
    }
}
