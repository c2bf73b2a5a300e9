//! Plan detail validation and aggregation.
//!
//! `PlanService` holds every rule a plan write must satisfy. The
//! persistence layer calls it with a fresh category snapshot before
//! touching storage, so a rejected write never leaves partial state.

use std::collections::{HashMap, HashSet};

use budgetwise_shared::types::{CategoryId, Month, MonthlyAmounts, PlanDetailId};
use rust_decimal::Decimal;

use crate::category::{CategoryTree, CategoryType};
use crate::plan::error::PlanError;
use crate::plan::types::{
    BudgetVersion, BulkFailure, EditCommand, EditLog, PlanDetail, PlanTotals,
    UpsertPlanDetailInput, ValidatedEdit,
};
use crate::workflow::WorkflowService;

/// Stateless service for plan detail rules.
pub struct PlanService;

impl PlanService {
    /// Checks that the version's plan may be edited.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::VersionLocked` unless the version is in `Draft`
    /// or `RevisionRequested`.
    pub fn ensure_editable(version: &BudgetVersion) -> Result<(), PlanError> {
        WorkflowService::ensure_editable(version.status).map_err(|_| PlanError::VersionLocked {
            version_id: version.id,
            status: version.status,
        })
    }

    /// Checks that the version may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::VersionNotDeletable` unless the version is in
    /// `Draft` or `Rejected`.
    pub fn ensure_deletable(version: &BudgetVersion) -> Result<(), PlanError> {
        if version.status.is_deletable() {
            Ok(())
        } else {
            Err(PlanError::VersionNotDeletable {
                version_id: version.id,
                status: version.status,
            })
        }
    }

    /// Trims a version name.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::EmptyName` if the name is blank.
    pub fn validate_name(name: &str) -> Result<String, PlanError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::EmptyName);
        }
        Ok(name.to_string())
    }

    /// Next version number for `year`: one past the highest existing
    /// number, starting at 1.
    #[must_use]
    pub fn next_version_number<'a>(
        versions: impl IntoIterator<Item = &'a BudgetVersion>,
        year: i32,
    ) -> u32 {
        versions
            .into_iter()
            .filter(|v| v.year == year)
            .map(|v| v.version_number)
            .max()
            .map_or(1, |n| n.saturating_add(1))
    }

    /// Validates a single upsert against the version and category snapshot.
    ///
    /// # Errors
    ///
    /// - `PlanError::VersionLocked` if the version is not editable
    /// - `PlanError::InvalidMonth` if the month is outside 1..=12
    /// - `PlanError::NegativeAmount` if the amount is below zero
    /// - `PlanError::CategoryNotFound` if the category is not in the snapshot
    /// - `PlanError::NotLeaf` if the category has active children
    pub fn validate_upsert(
        version: &BudgetVersion,
        tree: &CategoryTree,
        input: &UpsertPlanDetailInput,
    ) -> Result<ValidatedEdit, PlanError> {
        Self::ensure_editable(version)?;
        Self::validate_entry(tree, input)
    }

    /// Validates every command of an edit log.
    ///
    /// Nothing is short-circuited: on failure every rejected command is
    /// reported, keyed by its position in the log.
    ///
    /// # Errors
    ///
    /// Returns the list of failures if the version is locked or any
    /// command is invalid.
    pub fn validate_edits(
        version: &BudgetVersion,
        tree: &CategoryTree,
        log: &EditLog,
        existing: &[PlanDetail],
    ) -> Result<Vec<ValidatedEdit>, Vec<BulkFailure>> {
        if let Err(err) = Self::ensure_editable(version) {
            return Err(vec![BulkFailure::new("version", err)]);
        }

        let known: HashSet<PlanDetailId> = existing
            .iter()
            .filter(|d| d.version_id == version.id)
            .map(|d| d.id)
            .collect();

        let mut edits = Vec::with_capacity(log.len());
        let mut failures = Vec::new();
        for (position, command) in log.iter().enumerate() {
            let result = match command {
                EditCommand::Upsert(input) => Self::validate_entry(tree, input),
                EditCommand::Delete { detail_id } => {
                    if known.contains(detail_id) {
                        Ok(ValidatedEdit::Delete(*detail_id))
                    } else {
                        Err(PlanError::DetailNotFound(*detail_id))
                    }
                }
            };
            match result {
                Ok(edit) => edits.push(edit),
                Err(err) => {
                    failures.push(BulkFailure::new(format!("command #{}", position + 1), err));
                }
            }
        }

        if failures.is_empty() {
            Ok(edits)
        } else {
            Err(failures)
        }
    }

    /// Per-month OPEX, CAPEX and grand totals from leaf rows only.
    ///
    /// Rows whose category is unknown to the snapshot, no longer a leaf, or
    /// inactive along its path to the root are skipped.
    #[must_use]
    pub fn sum_monthly(details: &[PlanDetail], tree: &CategoryTree) -> PlanTotals {
        let mut totals = PlanTotals::default();
        for detail in details {
            if !tree.is_leaf(detail.category_id) || !tree.is_active(detail.category_id) {
                continue;
            }
            let category_type = tree
                .get(detail.category_id)
                .map_or(detail.category_type, |c| c.category_type);
            match category_type {
                CategoryType::Opex => totals.opex[detail.month] += detail.amount,
                CategoryType::Capex => totals.capex[detail.month] += detail.amount,
            }
        }
        totals.total = totals.opex + totals.capex;
        totals.annual_opex = totals.opex.total();
        totals.annual_capex = totals.capex.total();
        totals.annual_total = totals.annual_opex + totals.annual_capex;
        totals
    }

    /// Collects rows into twelve-month arrays keyed by category.
    #[must_use]
    pub fn monthly_values(details: &[PlanDetail]) -> HashMap<CategoryId, MonthlyAmounts> {
        let mut values: HashMap<CategoryId, MonthlyAmounts> = HashMap::new();
        for detail in details {
            values.entry(detail.category_id).or_default()[detail.month] += detail.amount;
        }
        values
    }

    fn validate_entry(
        tree: &CategoryTree,
        input: &UpsertPlanDetailInput,
    ) -> Result<ValidatedEdit, PlanError> {
        let month = Month::new(input.month).ok_or(PlanError::InvalidMonth(input.month))?;
        if input.amount < Decimal::ZERO {
            return Err(PlanError::NegativeAmount(input.amount));
        }
        let category = tree
            .get(input.category_id)
            .ok_or(PlanError::CategoryNotFound(input.category_id))?;
        if !tree.is_active(input.category_id) {
            return Err(PlanError::InactiveCategory(input.category_id));
        }
        if !tree.is_leaf(input.category_id) {
            return Err(PlanError::NotLeaf(input.category_id));
        }

        Ok(ValidatedEdit::Upsert {
            category_id: input.category_id,
            month,
            amount: input.amount,
            category_type: category.category_type,
            method: input.method,
            based_on_year: input.based_on_year,
        })
    }
}
