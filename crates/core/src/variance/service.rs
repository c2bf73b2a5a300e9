//! Planned versus actual comparisons.
//!
//! Category figures are always derived from rolled-up leaf amounts:
//! planned and actual are summed separately and the percentages are
//! computed from the sums, never averaged from child percentages.

use std::collections::{HashMap, HashSet};

use budgetwise_shared::types::{BudgetVersionId, CategoryId, Month, MonthlyAmounts};
use rust_decimal::Decimal;

use super::error::VarianceError;
use super::types::{
    AlertLevel, AlertThresholds, CategoryVariance, MonthlyVariance, Percent, VarianceFigures,
    VarianceReport,
};
use crate::category::CategoryTree;
use crate::workflow::VersionStatus;

/// Stateless variance engine.
pub struct VarianceEngine;

impl VarianceEngine {
    /// `actual / planned * 100`.
    ///
    /// Zero when both are zero; [`Percent::NoPlan`] when only planned is.
    #[must_use]
    pub fn execution_percent(planned: Decimal, actual: Decimal) -> Percent {
        ratio(actual, planned)
    }

    /// `(actual - planned) / planned * 100`, with the same zero rules as
    /// [`Self::execution_percent`].
    #[must_use]
    pub fn variance_percent(planned: Decimal, actual: Decimal) -> Percent {
        if planned.is_zero() {
            return ratio(actual, planned);
        }
        ratio(Self::difference(planned, actual), planned)
    }

    /// `actual - planned`.
    #[must_use]
    pub fn difference(planned: Decimal, actual: Decimal) -> Decimal {
        actual - planned
    }

    /// `actual > planned`.
    #[must_use]
    pub fn is_over_budget(planned: Decimal, actual: Decimal) -> bool {
        actual > planned
    }

    /// All figures for one planned/actual pair.
    #[must_use]
    pub fn figures(planned: Decimal, actual: Decimal) -> VarianceFigures {
        VarianceFigures {
            planned,
            actual,
            difference: Self::difference(planned, actual),
            is_over_budget: Self::is_over_budget(planned, actual),
            execution_percent: Self::execution_percent(planned, actual),
            variance_percent: Self::variance_percent(planned, actual),
        }
    }

    /// Alert level of a variance percentage.
    ///
    /// Unplanned spend is always critical.
    #[must_use]
    pub fn classify(variance: Percent, thresholds: &AlertThresholds) -> AlertLevel {
        match variance {
            Percent::NoPlan => AlertLevel::Critical,
            Percent::Value(v) if v.abs() > thresholds.critical() => AlertLevel::Critical,
            Percent::Value(v) if v.abs() > thresholds.warning() => AlertLevel::Warning,
            Percent::Value(_) => AlertLevel::Normal,
        }
    }

    /// Checks that a version in `status` has a plan worth comparing.
    ///
    /// # Errors
    ///
    /// Returns `VarianceError::VersionNotApproved` unless the version is
    /// `Approved` or `Archived`.
    pub fn ensure_reportable(
        version_id: BudgetVersionId,
        status: VersionStatus,
    ) -> Result<(), VarianceError> {
        if status.is_approved() {
            Ok(())
        } else {
            Err(VarianceError::VersionNotApproved { version_id, status })
        }
    }

    /// Builds the variance report of a whole tree.
    ///
    /// Rows follow the tree outline. Values keyed on non-leaf categories
    /// are ignored on both sides; grand totals are the sum over roots.
    #[must_use]
    pub fn report(
        tree: &CategoryTree,
        planned: &HashMap<CategoryId, MonthlyAmounts>,
        actual: &HashMap<CategoryId, MonthlyAmounts>,
        thresholds: &AlertThresholds,
    ) -> VarianceReport {
        let planned = tree.roll_up(planned);
        let actual = tree.roll_up(actual);
        let outline = tree.outline();
        let present: HashSet<CategoryId> = outline.iter().map(|e| e.category_id).collect();
        let placement = tree.placement(&present);

        let categories = outline
            .into_iter()
            .map(|entry| {
                let id = entry.category_id;
                let p = planned.get(&id).copied().unwrap_or_default();
                let a = actual.get(&id).copied().unwrap_or_default();
                let annual = Self::figures(p.total(), a.total());
                CategoryVariance {
                    category_id: id,
                    name: entry.name,
                    category_type: entry.category_type,
                    display_parent_id: placement.get(&id).copied().flatten(),
                    depth: entry.depth,
                    is_leaf: entry.is_leaf,
                    alert: Self::classify(annual.variance_percent, thresholds),
                    annual,
                    monthly: monthly_figures(&p, &a),
                }
            })
            .collect();

        let mut planned_total = MonthlyAmounts::ZERO;
        let mut actual_total = MonthlyAmounts::ZERO;
        for root in tree.roots().into_iter().filter(|&root| tree.is_active(root)) {
            if let Some(p) = planned.get(&root) {
                planned_total += p;
            }
            if let Some(a) = actual.get(&root) {
                actual_total += a;
            }
        }
        let totals = Self::figures(planned_total.total(), actual_total.total());

        VarianceReport {
            categories,
            alert: Self::classify(totals.variance_percent, thresholds),
            totals,
            monthly_totals: monthly_figures(&planned_total, &actual_total),
        }
    }
}

fn ratio(numerator: Decimal, planned: Decimal) -> Percent {
    if planned.is_zero() {
        if numerator.is_zero() {
            Percent::Value(Decimal::ZERO)
        } else {
            Percent::NoPlan
        }
    } else {
        Percent::Value(numerator * Decimal::ONE_HUNDRED / planned)
    }
}

fn monthly_figures(planned: &MonthlyAmounts, actual: &MonthlyAmounts) -> Vec<MonthlyVariance> {
    Month::all()
        .map(|month| MonthlyVariance {
            month,
            figures: VarianceEngine::figures(planned[month], actual[month]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, CategoryType};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), dec!(500), Percent::NoPlan)]
    #[case(dec!(0), dec!(0), Percent::Value(dec!(0)))]
    #[case(dec!(1000), dec!(1100), Percent::Value(dec!(110)))]
    #[case(dec!(1000), dec!(0), Percent::Value(dec!(0)))]
    #[case(dec!(400), dec!(100), Percent::Value(dec!(25)))]
    fn test_execution_percent(
        #[case] planned: Decimal,
        #[case] actual: Decimal,
        #[case] expected: Percent,
    ) {
        assert_eq!(VarianceEngine::execution_percent(planned, actual), expected);
    }

    #[rstest]
    #[case(dec!(0), dec!(500), Percent::NoPlan)]
    #[case(dec!(0), dec!(0), Percent::Value(dec!(0)))]
    #[case(dec!(1000), dec!(1100), Percent::Value(dec!(10)))]
    #[case(dec!(1000), dec!(900), Percent::Value(dec!(-10)))]
    fn test_variance_percent(
        #[case] planned: Decimal,
        #[case] actual: Decimal,
        #[case] expected: Percent,
    ) {
        assert_eq!(VarianceEngine::variance_percent(planned, actual), expected);
    }

    #[test]
    fn test_figures() {
        let f = VarianceEngine::figures(dec!(1000), dec!(1100));
        assert_eq!(f.difference, dec!(100));
        assert!(f.is_over_budget);

        let f = VarianceEngine::figures(dec!(1000), dec!(1000));
        assert_eq!(f.difference, dec!(0));
        assert!(!f.is_over_budget);
    }

    #[rstest]
    #[case(Percent::Value(dec!(0)), AlertLevel::Normal)]
    #[case(Percent::Value(dec!(5)), AlertLevel::Normal)]
    #[case(Percent::Value(dec!(5.01)), AlertLevel::Warning)]
    #[case(Percent::Value(dec!(-7)), AlertLevel::Warning)]
    #[case(Percent::Value(dec!(10)), AlertLevel::Warning)]
    #[case(Percent::Value(dec!(10.5)), AlertLevel::Critical)]
    #[case(Percent::Value(dec!(-40)), AlertLevel::Critical)]
    #[case(Percent::NoPlan, AlertLevel::Critical)]
    fn test_classify(#[case] variance: Percent, #[case] expected: AlertLevel) {
        let thresholds = AlertThresholds::new(dec!(5), dec!(10)).unwrap();
        assert_eq!(VarianceEngine::classify(variance, &thresholds), expected);
    }

    #[test]
    fn test_thresholds_validated() {
        assert!(AlertThresholds::new(dec!(0), dec!(0)).is_ok());
        assert!(matches!(
            AlertThresholds::new(dec!(-1), dec!(10)),
            Err(VarianceError::InvalidThresholds { .. })
        ));
        assert!(matches!(
            AlertThresholds::new(dec!(20), dec!(10)),
            Err(VarianceError::InvalidThresholds { .. })
        ));
        assert_eq!(AlertThresholds::default().warning(), dec!(5));
    }

    #[test]
    fn test_ensure_reportable() {
        let id = BudgetVersionId::new();
        assert!(VarianceEngine::ensure_reportable(id, VersionStatus::Approved).is_ok());
        assert!(VarianceEngine::ensure_reportable(id, VersionStatus::Archived).is_ok());
        assert_eq!(
            VarianceEngine::ensure_reportable(id, VersionStatus::InReview),
            Err(VarianceError::VersionNotApproved {
                version_id: id,
                status: VersionStatus::InReview,
            })
        );
    }

    fn cat(name: &str, parent: Option<CategoryId>) -> Category {
        Category {
            id: CategoryId::new(),
            name: name.to_string(),
            category_type: CategoryType::Opex,
            parent_id: parent,
            department_id: None,
            is_active: true,
        }
    }

    #[test]
    fn test_report_uses_summed_amounts_not_averaged_percentages() {
        // Software → {Licenses, Subscriptions}
        let software = cat("Software", None);
        let licenses = cat("Licenses", Some(software.id));
        let subs = cat("Subscriptions", Some(software.id));
        let ids = (software.id, licenses.id, subs.id);
        let tree = CategoryTree::build(vec![software, licenses, subs]).unwrap();

        let mut planned = HashMap::new();
        let mut planned_licenses = MonthlyAmounts::ZERO;
        planned_licenses[Month::JANUARY] = dec!(1000);
        planned.insert(ids.1, planned_licenses);
        let mut planned_subs = MonthlyAmounts::ZERO;
        planned_subs[Month::JANUARY] = dec!(100);
        planned.insert(ids.2, planned_subs);

        let mut actual = HashMap::new();
        let mut actual_licenses = MonthlyAmounts::ZERO;
        actual_licenses[Month::JANUARY] = dec!(1000);
        actual.insert(ids.1, actual_licenses);
        let mut actual_subs = MonthlyAmounts::ZERO;
        actual_subs[Month::JANUARY] = dec!(200);
        actual.insert(ids.2, actual_subs);
        // A parent-level actual never counts.
        actual.insert(ids.0, MonthlyAmounts::uniform(dec!(5000)));

        let report =
            VarianceEngine::report(&tree, &planned, &actual, &AlertThresholds::default());

        let names: Vec<&str> = report.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Software", "Licenses", "Subscriptions"]);

        let parent = &report.categories[0];
        assert_eq!(parent.annual.planned, dec!(1100));
        assert_eq!(parent.annual.actual, dec!(1200));
        // 1200 / 1100, not the mean of 100% and 200%.
        assert_eq!(
            parent.annual.execution_percent,
            Percent::Value(dec!(120000) / dec!(1100))
        );
        // (1200 - 1100) / 1100 is about 9.09%.
        assert_eq!(parent.alert, AlertLevel::Warning);
        assert_eq!(parent.monthly.len(), 12);
        assert_eq!(parent.monthly[0].figures.actual, dec!(1200));

        let subs_row = &report.categories[2];
        assert_eq!(subs_row.display_parent_id, Some(ids.0));
        assert_eq!(subs_row.depth, 1);
        assert_eq!(subs_row.alert, AlertLevel::Critical);

        assert_eq!(report.totals.planned, dec!(1100));
        assert_eq!(report.totals.actual, dec!(1200));
        assert_eq!(report.monthly_totals[0].figures.planned, dec!(1100));
        assert_eq!(report.alerts(AlertLevel::Critical).count(), 1);
    }

    #[test]
    fn test_report_flags_unplanned_spend() {
        let misc = cat("Misc", None);
        let id = misc.id;
        let tree = CategoryTree::build(vec![misc]).unwrap();

        let mut actual = HashMap::new();
        actual.insert(id, MonthlyAmounts::uniform(dec!(10)));

        let report =
            VarianceEngine::report(&tree, &HashMap::new(), &actual, &AlertThresholds::default());
        assert_eq!(report.categories[0].annual.execution_percent, Percent::NoPlan);
        assert_eq!(report.categories[0].alert, AlertLevel::Critical);
        assert_eq!(report.alert, AlertLevel::Critical);
    }

    #[test]
    fn test_report_on_empty_data_is_normal() {
        let misc = cat("Misc", None);
        let tree = CategoryTree::build(vec![misc]).unwrap();
        let report = VarianceEngine::report(
            &tree,
            &HashMap::new(),
            &HashMap::new(),
            &AlertThresholds::default(),
        );
        assert_eq!(report.categories[0].annual.execution_percent, Percent::Value(dec!(0)));
        assert_eq!(report.alert, AlertLevel::Normal);
    }
}
