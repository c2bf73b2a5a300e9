//! Property-based tests for VarianceEngine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::variance::service::VarianceEngine;
use crate::variance::types::{AlertLevel, AlertThresholds, Percent};

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_thresholds() -> impl Strategy<Value = AlertThresholds> {
    (0i64..50, 0i64..50).prop_map(|(a, b)| {
        let (warning, critical) = if a <= b { (a, b) } else { (b, a) };
        AlertThresholds::new(Decimal::from(warning), Decimal::from(critical)).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Execution percent is NoPlan exactly when planned is zero and actual
    /// is not.
    #[test]
    fn prop_no_plan_iff_planned_zero(planned in arb_amount(), actual in arb_amount()) {
        let pct = VarianceEngine::execution_percent(planned, actual);
        prop_assert_eq!(
            pct == Percent::NoPlan,
            planned.is_zero() && !actual.is_zero()
        );
    }

    /// Over budget iff the variance percent is positive or unplanned.
    #[test]
    fn prop_over_budget_matches_sign(planned in arb_amount(), actual in arb_amount()) {
        let figures = VarianceEngine::figures(planned, actual);
        let positive = match figures.variance_percent {
            Percent::NoPlan => true,
            Percent::Value(v) => v > Decimal::ZERO,
        };
        prop_assert_eq!(figures.is_over_budget, positive);
        prop_assert_eq!(figures.difference, actual - planned);
    }

    /// Execution and variance percent differ by exactly 100 for a plan.
    #[test]
    fn prop_execution_is_variance_plus_hundred(
        planned in arb_amount().prop_filter("planned", |p| !p.is_zero()),
        actual in arb_amount(),
    ) {
        let execution = VarianceEngine::execution_percent(planned, actual).value().unwrap();
        let variance = VarianceEngine::variance_percent(planned, actual).value().unwrap();
        let drift = (execution - variance - Decimal::ONE_HUNDRED).abs();
        prop_assert!(drift < Decimal::new(1, 12));
    }

    /// A larger deviation never yields a lower alert level.
    #[test]
    fn prop_classify_monotonic(
        thresholds in arb_thresholds(),
        a in 0i64..10_000,
        b in 0i64..10_000,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low = VarianceEngine::classify(Percent::Value(Decimal::new(low, 2)), &thresholds);
        let high = VarianceEngine::classify(Percent::Value(Decimal::new(-high, 2)), &thresholds);
        prop_assert!(low <= high);
    }

    /// Within the warning threshold is always Normal.
    #[test]
    fn prop_within_warning_is_normal(thresholds in arb_thresholds(), basis_points in 0i64..=100) {
        let v = thresholds.warning() * Decimal::new(basis_points, 2);
        prop_assert_eq!(
            VarianceEngine::classify(Percent::Value(v), &thresholds),
            AlertLevel::Normal
        );
    }
}
