//! Property-based tests for ForecastCalculator.

use budgetwise_shared::types::{CategoryId, Currency, Month};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::forecast::service::ForecastCalculator;
use crate::forecast::types::{
    BaselineSummary, ForecastMethod, ForecastRequest, MonthlyActual, MonthlySpread,
};

/// Amounts in cents up to 10 million.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Percent with one decimal place in (-100, 200].
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (-999i64..=2000).prop_map(|tenths| Decimal::new(tenths, 1))
}

fn arb_currency() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::Usd),
        Just(Currency::Eur),
        Just(Currency::Krw),
        Just(Currency::Jpy),
        Just(Currency::Sgd),
    ]
}

fn arb_baseline() -> impl Strategy<Value = BaselineSummary> {
    prop::collection::vec(arb_amount(), 12).prop_map(|amounts| {
        let category_id = CategoryId::new();
        let rows: Vec<MonthlyActual> = Month::all()
            .zip(amounts)
            .map(|(month, amount)| MonthlyActual {
                category_id,
                year: 2024,
                month,
                amount,
            })
            .collect();
        ForecastCalculator::baseline(category_id, 2024, &rows)
    })
}

fn arb_spread() -> impl Strategy<Value = MonthlySpread> {
    prop_oneof![Just(MonthlySpread::Even), Just(MonthlySpread::FollowBaseline)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Rounded months always sum exactly to the rounded annual total and are
    /// never negative.
    #[test]
    fn prop_rounded_months_sum_to_rounded_annual(
        baseline in arb_baseline(),
        adjustment in arb_percent(),
        spread in arb_spread(),
        currency in arb_currency(),
    ) {
        let request = ForecastRequest {
            category_id: baseline.category_id,
            target_year: 2025,
            base_year: None,
            method: ForecastMethod::Average { adjustment_percent: adjustment },
            spread,
        };
        let result = ForecastCalculator::calculate(&request, &baseline).unwrap();
        let rounded = result.rounded_months(currency);
        prop_assert_eq!(rounded.total(), currency.round(result.annual_total));
        prop_assert!(rounded.iter().all(|(_, amount)| amount >= Decimal::ZERO));
    }

    /// Growth with zero inflation equals the average method with the same
    /// percentage.
    #[test]
    fn prop_growth_without_inflation_matches_average(
        base in arb_amount(),
        percent in arb_percent(),
    ) {
        let growth = ForecastCalculator::by_growth(base, percent, Decimal::ZERO).unwrap();
        let average = ForecastCalculator::by_average(base, percent).unwrap();
        prop_assert_eq!(growth, average);
    }

    /// Growth and inflation commute.
    #[test]
    fn prop_growth_and_inflation_commute(
        base in arb_amount(),
        growth in arb_percent(),
        inflation in arb_percent(),
    ) {
        let a = ForecastCalculator::by_growth(base, growth, inflation).unwrap();
        let b = ForecastCalculator::by_growth(base, inflation, growth).unwrap();
        prop_assert_eq!(a, b);
    }

    /// A larger adjustment never yields a smaller annual figure.
    #[test]
    fn prop_average_monotonic_in_adjustment(
        base in arb_amount(),
        low in arb_percent(),
        high in arb_percent(),
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let a = ForecastCalculator::by_average(base, low).unwrap();
        let b = ForecastCalculator::by_average(base, high).unwrap();
        prop_assert!(a <= b);
    }

    /// With an explicit cost per unit the base driver value never matters.
    #[test]
    fn prop_explicit_cost_ignores_base_driver(
        base in arb_amount(),
        base_driver in 0i64..1000,
        planned in 0i64..1000,
        cost in arb_amount(),
    ) {
        let (cpu, annual) = ForecastCalculator::by_driver(
            base,
            Decimal::from(base_driver),
            Decimal::from(planned),
            Some(cost),
            Decimal::ZERO,
        )
        .unwrap();
        prop_assert_eq!(cpu, cost);
        prop_assert_eq!(annual, cost * Decimal::from(planned));
    }

    /// The baseline-shaped spread keeps every month non-negative and never
    /// exceeds the annual total.
    #[test]
    fn prop_follow_baseline_shares_bounded(
        baseline in arb_baseline(),
        annual in arb_amount(),
    ) {
        let monthly =
            ForecastCalculator::spread(annual, MonthlySpread::FollowBaseline, &baseline).unwrap();
        for (_, amount) in monthly.iter() {
            prop_assert!(amount >= Decimal::ZERO);
            prop_assert!(amount <= annual);
        }
    }
}
