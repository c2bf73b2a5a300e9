//! Variance data types.

use budgetwise_shared::types::{CategoryId, Month};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::CategoryType;
use crate::variance::error::VarianceError;

/// A percentage on the 0-100 scale, or the marker for an unplanned
/// figure (planned zero, actual non-zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Percent {
    /// A computed percentage.
    Value(Decimal),
    /// Nothing was planned but something was spent.
    NoPlan,
}

impl Percent {
    /// The computed percentage, if any.
    #[must_use]
    pub const fn value(&self) -> Option<Decimal> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NoPlan => None,
        }
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}%"),
            Self::NoPlan => f.write_str("NO_PLAN"),
        }
    }
}

/// Planned versus actual for one amount pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceFigures {
    /// Planned amount.
    pub planned: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// `actual - planned`.
    pub difference: Decimal,
    /// `actual > planned`.
    pub is_over_budget: bool,
    /// `actual / planned * 100`.
    pub execution_percent: Percent,
    /// `(actual - planned) / planned * 100`.
    pub variance_percent: Percent,
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    /// Within the warning threshold.
    Normal,
    /// Beyond the warning threshold.
    Warning,
    /// Beyond the critical threshold, or unplanned spend.
    Critical,
}

impl AlertLevel {
    /// Returns the string representation of the level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute variance percentages that raise alerts.
///
/// Construct with [`AlertThresholds::new`], which enforces
/// `0 <= warning <= critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertThresholds {
    warning: Decimal,
    critical: Decimal,
}

impl AlertThresholds {
    /// Creates thresholds.
    ///
    /// # Errors
    ///
    /// Returns `VarianceError::InvalidThresholds` unless
    /// `0 <= warning <= critical`.
    pub fn new(warning: Decimal, critical: Decimal) -> Result<Self, VarianceError> {
        if warning < Decimal::ZERO || warning > critical {
            return Err(VarianceError::InvalidThresholds { warning, critical });
        }
        Ok(Self { warning, critical })
    }

    /// Warning threshold.
    #[must_use]
    pub const fn warning(&self) -> Decimal {
        self.warning
    }

    /// Critical threshold.
    #[must_use]
    pub const fn critical(&self) -> Decimal {
        self.critical
    }
}

impl Default for AlertThresholds {
    /// Warning beyond 5%, critical beyond 10%.
    fn default() -> Self {
        Self {
            warning: Decimal::new(5, 0),
            critical: Decimal::new(10, 0),
        }
    }
}

/// Variance of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyVariance {
    /// Month.
    pub month: Month,
    /// Figures for the month.
    pub figures: VarianceFigures,
}

/// Variance of one category, rolled up from its leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVariance {
    /// Category.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// OPEX or CAPEX.
    pub category_type: CategoryType,
    /// Parent the report nests this row under.
    pub display_parent_id: Option<CategoryId>,
    /// Nesting depth in the report.
    pub depth: usize,
    /// Whether the category is a leaf.
    pub is_leaf: bool,
    /// Annual figures.
    pub annual: VarianceFigures,
    /// Per-month figures, January first.
    pub monthly: Vec<MonthlyVariance>,
    /// Alert level of the annual variance.
    pub alert: AlertLevel,
}

/// Variance of a whole version against actuals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceReport {
    /// Per-category rows in outline order.
    pub categories: Vec<CategoryVariance>,
    /// Grand totals over leaf sums.
    pub totals: VarianceFigures,
    /// Grand totals per month.
    pub monthly_totals: Vec<MonthlyVariance>,
    /// Alert level of the grand total.
    pub alert: AlertLevel,
}

impl VarianceReport {
    /// Rows at or above `level`.
    pub fn alerts(&self, level: AlertLevel) -> impl Iterator<Item = &CategoryVariance> {
        self.categories.iter().filter(move |c| c.alert >= level)
    }
}
