//! Forecast calculations.
//!
//! Every figure stays at full `Decimal` precision. Rounding to a
//! currency's minor unit happens only when results are written or
//! presented, via [`CalculationResult::rounded_months`].

use budgetwise_shared::types::{CategoryId, Month, MonthlyAmounts};
use rust_decimal::Decimal;

use super::error::ForecastError;
use super::types::{
    BaselineSummary, CalculationResult, ForecastMethod, ForecastRequest, MonthlyActual,
    MonthlySpread,
};

const MONTHS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Stateless forecast calculator.
pub struct ForecastCalculator;

impl ForecastCalculator {
    /// Sums the actual rows of one category and year into a baseline.
    ///
    /// Rows for other categories or years are ignored; no matching rows
    /// yield a zero-filled summary.
    #[must_use]
    pub fn baseline(category_id: CategoryId, year: i32, rows: &[MonthlyActual]) -> BaselineSummary {
        let mut monthly = MonthlyAmounts::ZERO;
        for row in rows
            .iter()
            .filter(|r| r.category_id == category_id && r.year == year)
        {
            monthly[row.month] += row.amount;
        }
        let total = monthly.total();
        BaselineSummary {
            category_id,
            year,
            total,
            monthly_average: total / MONTHS,
            monthly,
        }
    }

    /// Average method: `base_total * (1 + adjustment / 100)`.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::InvalidParameter` if the adjustment is at or
    /// below -100% or the result overflows.
    pub fn by_average(
        base_total: Decimal,
        adjustment_percent: Decimal,
    ) -> Result<Decimal, ForecastError> {
        let factor = percent_factor("adjustment_percent", adjustment_percent)?;
        mul(base_total, factor)
    }

    /// Growth method: `base * (1 + growth / 100) * (1 + inflation / 100)`.
    ///
    /// Growth and inflation compound multiplicatively.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::InvalidParameter` if either percent is at or
    /// below -100% or the result overflows.
    pub fn by_growth(
        base_total: Decimal,
        growth_percent: Decimal,
        inflation_percent: Decimal,
    ) -> Result<Decimal, ForecastError> {
        let growth = percent_factor("growth_percent", growth_percent)?;
        let inflation = percent_factor("inflation_percent", inflation_percent)?;
        mul(mul(base_total, growth)?, inflation)
    }

    /// Driver method. Returns `(cost_per_unit, annual_total)`.
    ///
    /// `cost_per_unit` is the explicit value when given, otherwise
    /// `base_total / base_driver_value`; the annual total is
    /// `cost_per_unit * planned_driver_value * (1 + adjustment / 100)`.
    ///
    /// # Errors
    ///
    /// - `ForecastError::DivisionByZero` if no cost per unit is given and the
    ///   base driver value is zero
    /// - `ForecastError::InvalidParameter` for negative driver values or cost,
    ///   an adjustment at or below -100%, or overflow
    pub fn by_driver(
        base_total: Decimal,
        base_driver_value: Decimal,
        planned_driver_value: Decimal,
        cost_per_unit: Option<Decimal>,
        adjustment_percent: Decimal,
    ) -> Result<(Decimal, Decimal), ForecastError> {
        non_negative("base_driver_value", base_driver_value)?;
        non_negative("planned_driver_value", planned_driver_value)?;
        let factor = percent_factor("adjustment_percent", adjustment_percent)?;

        let cost_per_unit = match cost_per_unit {
            Some(explicit) => {
                non_negative("cost_per_unit", explicit)?;
                explicit
            }
            None if base_driver_value.is_zero() => {
                return Err(ForecastError::DivisionByZero(
                    "base driver value is zero and no cost per unit was given".to_string(),
                ));
            }
            None => base_total
                .checked_div(base_driver_value)
                .ok_or_else(|| overflow("cost_per_unit"))?,
        };

        let annual = mul(mul(cost_per_unit, planned_driver_value)?, factor)?;
        Ok((cost_per_unit, annual))
    }

    /// Runs a forecast request against a baseline.
    ///
    /// # Errors
    ///
    /// Propagates the method's validation errors.
    pub fn calculate(
        request: &ForecastRequest,
        baseline: &BaselineSummary,
    ) -> Result<CalculationResult, ForecastError> {
        let (annual_total, cost_per_unit) = match &request.method {
            ForecastMethod::Average { adjustment_percent } => {
                (Self::by_average(baseline.total, *adjustment_percent)?, None)
            }
            ForecastMethod::Growth {
                growth_percent,
                inflation_percent,
            } => (
                Self::by_growth(baseline.total, *growth_percent, *inflation_percent)?,
                None,
            ),
            ForecastMethod::Driver {
                base_driver_value,
                planned_driver_value,
                cost_per_unit,
                adjustment_percent,
                ..
            } => {
                let (cpu, annual) = Self::by_driver(
                    baseline.total,
                    *base_driver_value,
                    *planned_driver_value,
                    *cost_per_unit,
                    *adjustment_percent,
                )?;
                (annual, Some(cpu))
            }
        };

        Ok(CalculationResult {
            category_id: request.category_id,
            target_year: request.target_year,
            method: request.method.calculation_method(),
            annual_total,
            monthly_average: annual_total / MONTHS,
            monthly: Self::spread(annual_total, request.spread, baseline)?,
            based_on_year: baseline.year,
            cost_per_unit,
        })
    }

    /// Distributes an annual figure over twelve months.
    ///
    /// `FollowBaseline` falls back to an even spread when the baseline
    /// total is zero.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::InvalidParameter` on overflow.
    pub fn spread(
        annual_total: Decimal,
        spread: MonthlySpread,
        baseline: &BaselineSummary,
    ) -> Result<MonthlyAmounts, ForecastError> {
        if spread == MonthlySpread::Even || baseline.total.is_zero() {
            return Ok(MonthlyAmounts::uniform(annual_total / MONTHS));
        }

        let mut monthly = MonthlyAmounts::ZERO;
        for month in Month::all() {
            monthly[month] = mul(annual_total, baseline.monthly[month])?
                .checked_div(baseline.total)
                .ok_or_else(|| overflow("monthly share"))?;
        }
        Ok(monthly)
    }
}

/// `1 + percent / 100`, rejecting percents at or below -100.
fn percent_factor(name: &'static str, percent: Decimal) -> Result<Decimal, ForecastError> {
    if percent <= -Decimal::ONE_HUNDRED {
        return Err(ForecastError::InvalidParameter {
            name,
            reason: format!("must be greater than -100, got {percent}"),
        });
    }
    Ok((Decimal::ONE_HUNDRED + percent) / Decimal::ONE_HUNDRED)
}

fn non_negative(name: &'static str, value: Decimal) -> Result<(), ForecastError> {
    if value < Decimal::ZERO {
        return Err(ForecastError::InvalidParameter {
            name,
            reason: format!("cannot be negative, got {value}"),
        });
    }
    Ok(())
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, ForecastError> {
    a.checked_mul(b).ok_or_else(|| overflow("amount"))
}

fn overflow(name: &'static str) -> ForecastError {
    ForecastError::InvalidParameter {
        name,
        reason: "value out of range".to_string(),
    }
}
