//! In-memory tables behind a single async lock.
//!
//! `MemoryStore` is cheap to clone; every clone shares the same tables.
//! Repositories take the write guard for the whole of a write so that
//! the check and the mutation happen in one critical section.

use std::collections::HashMap;
use std::sync::Arc;

use budgetwise_core::category::{Category, CategoryError, CategoryFilter, CategoryTree};
use budgetwise_core::forecast::MonthlyActual;
use budgetwise_core::plan::{BudgetVersion, PlanDetail, ValidatedEdit};
use budgetwise_core::workflow::ApprovalLogEntry;
use budgetwise_shared::types::{BudgetVersionId, CategoryId, Month, PlanDetailId, UserId};
use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Unique key of a plan detail row.
pub(crate) type DetailKey = (BudgetVersionId, CategoryId, Month);

/// The tables. Only repositories in this crate touch them directly.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub categories: HashMap<CategoryId, Category>,
    pub versions: HashMap<BudgetVersionId, BudgetVersion>,
    pub details: HashMap<PlanDetailId, PlanDetail>,
    pub detail_index: HashMap<DetailKey, PlanDetailId>,
    pub approval_log: Vec<ApprovalLogEntry>,
    pub actuals: Vec<MonthlyActual>,
}

impl Tables {
    /// Categories passing `filter`, sorted by name.
    pub fn categories(&self, filter: CategoryFilter) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .categories
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        categories
    }

    /// Snapshot of the full category hierarchy.
    pub fn tree(&self) -> Result<CategoryTree, CategoryError> {
        CategoryTree::build(self.categories.values().cloned())
    }

    /// Rows of one version ordered by category, then month.
    pub fn details_of(&self, version_id: BudgetVersionId) -> Vec<PlanDetail> {
        let mut rows: Vec<PlanDetail> = self
            .details
            .values()
            .filter(|d| d.version_id == version_id)
            .cloned()
            .collect();
        rows.sort_by_key(|d| (d.category_id, d.month));
        rows
    }

    /// Writes a validated edit.
    ///
    /// An upsert on an existing (version, category, month) key updates the
    /// row in place. Returns the written row, or `None` for a delete.
    pub fn apply(
        &mut self,
        version_id: BudgetVersionId,
        edit: ValidatedEdit,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Option<PlanDetail> {
        match edit {
            ValidatedEdit::Upsert {
                category_id,
                month,
                amount,
                category_type,
                method,
                based_on_year,
            } => {
                let key = (version_id, category_id, month);
                let id = *self
                    .detail_index
                    .entry(key)
                    .or_insert_with(PlanDetailId::new);
                let row = PlanDetail {
                    id,
                    version_id,
                    category_id,
                    month,
                    amount,
                    category_type,
                    method,
                    based_on_year,
                    updated_by: actor,
                    updated_at: now,
                };
                self.details.insert(id, row.clone());
                Some(row)
            }
            ValidatedEdit::Delete(id) => {
                self.remove_detail(id);
                None
            }
        }
    }

    /// Removes a detail row and its index entry.
    pub fn remove_detail(&mut self, id: PlanDetailId) -> Option<PlanDetail> {
        let row = self.details.remove(&id)?;
        self.detail_index
            .remove(&(row.version_id, row.category_id, row.month));
        Some(row)
    }

    /// Removes every detail row of a version; returns how many went.
    pub fn remove_details_of(&mut self, version_id: BudgetVersionId) -> usize {
        let ids: Vec<PlanDetailId> = self
            .details
            .values()
            .filter(|d| d.version_id == version_id)
            .map(|d| d.id)
            .collect();
        for id in &ids {
            self.remove_detail(*id);
        }
        ids.len()
    }
}

/// Shared handle to the in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }

    /// Records ledger actuals. Stands in for the external ledger feed.
    pub async fn record_actuals(&self, rows: impl IntoIterator<Item = MonthlyActual>) {
        self.write().await.actuals.extend(rows);
    }

    /// Number of plan detail rows across all versions.
    pub async fn detail_count(&self) -> usize {
        self.read().await.details.len()
    }

    /// Number of approval log entries, including those of deleted versions.
    pub async fn approval_log_len(&self) -> usize {
        self.read().await.approval_log.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetwise_core::category::CategoryType;
    use budgetwise_core::plan::CalculationMethod;
    use rust_decimal_macros::dec;

    fn upsert(category_id: CategoryId, month: u8, amount: rust_decimal::Decimal) -> ValidatedEdit {
        ValidatedEdit::Upsert {
            category_id,
            month: Month::new(month).unwrap(),
            amount,
            category_type: CategoryType::Opex,
            method: CalculationMethod::Manual,
            based_on_year: None,
        }
    }

    #[test]
    fn test_apply_updates_existing_key_in_place() {
        let mut tables = Tables::default();
        let version_id = BudgetVersionId::new();
        let category_id = CategoryId::new();
        let actor = UserId::new();

        let first = tables
            .apply(version_id, upsert(category_id, 3, dec!(100)), actor, Utc::now())
            .unwrap();
        let second = tables
            .apply(version_id, upsert(category_id, 3, dec!(250)), actor, Utc::now())
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(tables.details.len(), 1);
        assert_eq!(tables.details[&first.id].amount, dec!(250));
    }

    #[test]
    fn test_remove_details_of_clears_index() {
        let mut tables = Tables::default();
        let version_id = BudgetVersionId::new();
        let other = BudgetVersionId::new();
        let category_id = CategoryId::new();
        let actor = UserId::new();

        tables.apply(version_id, upsert(category_id, 1, dec!(1)), actor, Utc::now());
        tables.apply(version_id, upsert(category_id, 2, dec!(2)), actor, Utc::now());
        tables.apply(other, upsert(category_id, 1, dec!(3)), actor, Utc::now());

        assert_eq!(tables.remove_details_of(version_id), 2);
        assert_eq!(tables.details.len(), 1);
        assert_eq!(tables.detail_index.len(), 1);
        assert_eq!(tables.details_of(other).len(), 1);
    }

    #[test]
    fn test_details_ordered_by_category_then_month() {
        let mut tables = Tables::default();
        let version_id = BudgetVersionId::new();
        let a = CategoryId::new();
        let b = CategoryId::new();
        let actor = UserId::new();
        for (category, month) in [(b, 2), (a, 12), (b, 1), (a, 3)] {
            tables.apply(version_id, upsert(category, month, dec!(1)), actor, Utc::now());
        }

        let keys: Vec<_> = tables
            .details_of(version_id)
            .iter()
            .map(|d| (d.category_id, d.month.number()))
            .collect();
        let mut expected = vec![(a, 3), (a, 12), (b, 1), (b, 2)];
        expected.sort();
        assert_eq!(keys, expected);
    }
}
