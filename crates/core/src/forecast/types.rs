//! Forecast data types.

use budgetwise_shared::types::{CategoryId, Currency, Month, MonthlyAmounts};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::plan::CalculationMethod;

/// Business volume a driver-based forecast scales with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverType {
    /// Number of employees.
    Headcount,
    /// Number of projects.
    Projects,
    /// Revenue.
    Revenue,
    /// Number of users.
    Users,
    /// Number of devices.
    Devices,
}

impl DriverType {
    /// Returns the string representation of the driver.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Headcount => "headcount",
            Self::Projects => "projects",
            Self::Revenue => "revenue",
            Self::Users => "users",
            Self::Devices => "devices",
        }
    }
}

impl fmt::Display for DriverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an annual figure is spread over the twelve months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlySpread {
    /// One twelfth per month.
    #[default]
    Even,
    /// Proportional to the baseline's monthly shares.
    FollowBaseline,
}

/// Forecast method with its parameters. Percentages are on the 0-100 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "UPPERCASE")]
pub enum ForecastMethod {
    /// Baseline total adjusted by a percentage.
    Average {
        /// Adjustment percent.
        #[serde(default)]
        adjustment_percent: Decimal,
    },
    /// Baseline compounded by growth and then inflation.
    Growth {
        /// Growth percent.
        #[serde(default)]
        growth_percent: Decimal,
        /// Inflation percent.
        #[serde(default)]
        inflation_percent: Decimal,
    },
    /// Cost per driver unit times planned driver volume.
    Driver {
        /// What the driver counts.
        driver_type: DriverType,
        /// Driver volume in the baseline year.
        base_driver_value: Decimal,
        /// Planned driver volume.
        planned_driver_value: Decimal,
        /// Explicit cost per unit; derived from the baseline when absent.
        #[serde(default)]
        cost_per_unit: Option<Decimal>,
        /// Adjustment percent.
        #[serde(default)]
        adjustment_percent: Decimal,
    },
}

impl ForecastMethod {
    /// The calculation method recorded on plan details.
    #[must_use]
    pub const fn calculation_method(&self) -> CalculationMethod {
        match self {
            Self::Average { .. } => CalculationMethod::Average,
            Self::Growth { .. } => CalculationMethod::Growth,
            Self::Driver { .. } => CalculationMethod::Driver,
        }
    }
}

/// A forecast request for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Category to forecast.
    pub category_id: CategoryId,
    /// Year the forecast is for.
    pub target_year: i32,
    /// Baseline year; the year before `target_year` when absent.
    #[serde(default)]
    pub base_year: Option<i32>,
    /// Method and parameters.
    pub method: ForecastMethod,
    /// Monthly distribution.
    #[serde(default)]
    pub spread: MonthlySpread,
}

impl ForecastRequest {
    /// The baseline year this request reads.
    #[must_use]
    pub fn base_year(&self) -> i32 {
        self.base_year.unwrap_or(self.target_year.saturating_sub(1))
    }
}

/// One month of actual spending, as supplied by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyActual {
    /// Category.
    pub category_id: CategoryId,
    /// Year.
    pub year: i32,
    /// Month.
    pub month: Month,
    /// Actual amount.
    pub amount: Decimal,
}

/// Historical actual spending of a category in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSummary {
    /// Category.
    pub category_id: CategoryId,
    /// Source year.
    pub year: i32,
    /// Annual total.
    pub total: Decimal,
    /// `total / 12`.
    pub monthly_average: Decimal,
    /// Per-month actuals.
    pub monthly: MonthlyAmounts,
}

/// Outcome of a forecast calculation, at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Category.
    pub category_id: CategoryId,
    /// Year the forecast is for.
    pub target_year: i32,
    /// Method used.
    pub method: CalculationMethod,
    /// Annual planned total.
    pub annual_total: Decimal,
    /// `annual_total / 12`.
    pub monthly_average: Decimal,
    /// Per-month planned amounts.
    pub monthly: MonthlyAmounts,
    /// Baseline year the forecast was derived from.
    pub based_on_year: i32,
    /// Cost per driver unit, for driver-based forecasts.
    pub cost_per_unit: Option<Decimal>,
}

impl CalculationResult {
    /// Monthly amounts rounded to the currency's minor unit.
    ///
    /// The twelve months sum exactly to the rounded annual total. The
    /// rounding residual goes to December when December stays non-negative;
    /// otherwise it is taken one minor unit at a time from the largest month.
    #[must_use]
    pub fn rounded_months(&self, currency: Currency) -> MonthlyAmounts {
        let mut rounded = self.monthly.map(|amount| currency.round(amount));
        let mut residual = currency.round(self.annual_total) - rounded.total();
        if rounded[Month::DECEMBER] + residual >= Decimal::ZERO {
            rounded[Month::DECEMBER] += residual;
            return rounded;
        }

        let unit = Decimal::new(1, currency.minor_units());
        while residual < Decimal::ZERO {
            let Some(largest) = Month::all().max_by_key(|month| rounded[*month]) else {
                break;
            };
            if rounded[largest] < unit {
                break;
            }
            rounded[largest] -= unit;
            residual += unit;
        }
        rounded
    }
}
