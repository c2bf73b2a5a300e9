//! Plan data types.

use budgetwise_shared::AppError;
use budgetwise_shared::types::{
    BudgetVersionId, CategoryId, Currency, Month, MonthlyAmounts, PlanDetailId, UserId,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::CategoryType;
use crate::workflow::VersionStatus;

/// How a plan amount was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CalculationMethod {
    /// Typed in by hand.
    #[default]
    Manual,
    /// Baseline average with an adjustment.
    Average,
    /// Baseline compounded by growth and inflation.
    Growth,
    /// Cost per driver unit times planned driver volume.
    Driver,
}

impl CalculationMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Average => "AVERAGE",
            Self::Growth => "GROWTH",
            Self::Driver => "DRIVER",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MANUAL" => Some(Self::Manual),
            "AVERAGE" => Some(Self::Average),
            "GROWTH" => Some(Self::Growth),
            "DRIVER" => Some(Self::Driver),
            _ => None,
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated header totals of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VersionTotals {
    /// Grand total.
    pub total: Decimal,
    /// CAPEX subtotal.
    pub capex: Decimal,
    /// OPEX subtotal.
    pub opex: Decimal,
}

/// A yearly, numbered budget plan under approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetVersion {
    /// Version ID.
    pub id: BudgetVersionId,
    /// Plan year.
    pub year: i32,
    /// Sequence number within the year, starting at 1.
    pub version_number: u32,
    /// Display name.
    pub name: String,
    /// Currency of every amount in the version.
    pub currency: Currency,
    /// Workflow status.
    pub status: VersionStatus,
    /// Header totals as of the last refresh.
    pub totals: VersionTotals,
    /// Number of submissions so far.
    pub review_iteration: u32,
    /// Incremented on every status write.
    pub row_version: u64,
    /// Author.
    pub created_by: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last header change.
    pub updated_at: DateTime<Utc>,
}

/// Planned amount for one leaf category and month of a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDetail {
    /// Detail ID.
    pub id: PlanDetailId,
    /// Owning version.
    pub version_id: BudgetVersionId,
    /// Leaf category.
    pub category_id: CategoryId,
    /// Month.
    pub month: Month,
    /// Planned amount, never negative.
    pub amount: Decimal,
    /// Denormalised from the category.
    pub category_type: CategoryType,
    /// How the amount was produced.
    pub method: CalculationMethod,
    /// Baseline year for calculated amounts.
    pub based_on_year: Option<i32>,
    /// Last editor.
    pub updated_by: UserId,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting or updating a plan detail.
///
/// `month` is the raw 1-based number so out-of-range values reach
/// validation instead of failing deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertPlanDetailInput {
    /// Leaf category.
    pub category_id: CategoryId,
    /// Month number, 1..=12.
    pub month: u8,
    /// Planned amount.
    pub amount: Decimal,
    /// How the amount was produced.
    #[serde(default)]
    pub method: CalculationMethod,
    /// Baseline year for calculated amounts.
    #[serde(default)]
    pub based_on_year: Option<i32>,
}

/// A pending plan edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    /// Insert or update one (category, month) amount.
    Upsert(UpsertPlanDetailInput),
    /// Remove an existing detail.
    Delete {
        /// Detail to remove.
        detail_id: PlanDetailId,
    },
}

/// Ordered list of pending edits, applied together on save and discarded
/// on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditLog {
    commands: Vec<EditCommand>,
}

impl EditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pending upsert.
    pub fn upsert(&mut self, input: UpsertPlanDetailInput) {
        self.commands.push(EditCommand::Upsert(input));
    }

    /// Records a pending delete.
    pub fn delete(&mut self, detail_id: PlanDetailId) {
        self.commands.push(EditCommand::Delete { detail_id });
    }

    /// Discards every pending edit.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Number of pending edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pending edits in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &EditCommand> {
        self.commands.iter()
    }
}

impl FromIterator<EditCommand> for EditLog {
    fn from_iter<I: IntoIterator<Item = EditCommand>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

/// An edit that passed validation and can be written without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedEdit {
    /// Insert or update the (category, month) key.
    Upsert {
        /// Leaf category.
        category_id: CategoryId,
        /// Month.
        month: Month,
        /// Planned amount.
        amount: Decimal,
        /// Category type at validation time.
        category_type: CategoryType,
        /// How the amount was produced.
        method: CalculationMethod,
        /// Baseline year.
        based_on_year: Option<i32>,
    },
    /// Remove an existing detail.
    Delete(PlanDetailId),
}

/// Per-month OPEX, CAPEX and grand totals of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanTotals {
    /// OPEX per month.
    pub opex: MonthlyAmounts,
    /// CAPEX per month.
    pub capex: MonthlyAmounts,
    /// Grand total per month.
    pub total: MonthlyAmounts,
    /// Annual OPEX.
    pub annual_opex: Decimal,
    /// Annual CAPEX.
    pub annual_capex: Decimal,
    /// Annual grand total.
    pub annual_total: Decimal,
}

impl PlanTotals {
    /// Header totals derived from these sums.
    #[must_use]
    pub fn version_totals(&self) -> VersionTotals {
        VersionTotals {
            total: self.annual_total,
            capex: self.annual_capex,
            opex: self.annual_opex,
        }
    }
}

/// Input for creating a version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVersionInput {
    /// Plan year.
    pub year: i32,
    /// Display name.
    pub name: String,
    /// Currency; the configured default when absent.
    #[serde(default)]
    pub currency: Option<Currency>,
    /// Author.
    pub created_by: UserId,
    /// Existing version whose plan details seed the new one.
    #[serde(default)]
    pub copy_from: Option<BudgetVersionId>,
}

/// One failed item of a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    /// Which item failed (a month, a category, a command position).
    pub item: String,
    /// Stable error code.
    pub error_code: String,
    /// Why it failed.
    pub message: String,
}

impl BulkFailure {
    /// Records `err` against `item`.
    pub fn new(item: impl Into<String>, err: impl Into<AppError>) -> Self {
        let err = err.into();
        Self {
            item: item.into(),
            error_code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a set of independent per-item writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    /// Number of items written.
    pub success_count: usize,
    /// Items that failed, with reasons.
    pub failures: Vec<BulkFailure>,
    /// True if the operation stopped early on cancellation.
    #[serde(default)]
    pub cancelled: bool,
}

impl BulkResult {
    /// Returns true if every item was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}
