//! Demo data for local development.
//!
//! Seeds a small IT category tree and twelve months of ledger actuals for
//! the year before the planning year, so forecasts have a baseline.

use budgetwise_core::category::{CategoryError, CategoryFilter, CategoryType, CreateCategoryInput};
use budgetwise_core::forecast::MonthlyActual;
use budgetwise_shared::types::Month;
use rust_decimal::Decimal;
use tracing::info;

use crate::Repositories;

/// Root name, leaves with their monthly base spend, and expenditure type.
const DEMO_TREE: &[(&str, &[(&str, i64)], CategoryType)] = &[
    (
        "Infrastructure",
        &[("Cloud Hosting", 8_000), ("Network", 1_500)],
        CategoryType::Opex,
    ),
    (
        "Software",
        &[("SaaS Subscriptions", 3_200), ("Licences", 2_400)],
        CategoryType::Opex,
    ),
    (
        "Hardware",
        &[("Laptops", 4_000), ("Servers", 6_500)],
        CategoryType::Capex,
    ),
];

/// What the seeder wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Categories created.
    pub categories: usize,
    /// Actual rows recorded.
    pub actual_rows: usize,
}

/// Seeds the demo tree and actuals for `planning_year - 1`.
///
/// Does nothing when categories already exist.
///
/// # Errors
///
/// Propagates category creation errors.
pub async fn seed_demo_data(
    repos: &Repositories,
    planning_year: i32,
) -> Result<SeedSummary, CategoryError> {
    if !repos.categories.list(CategoryFilter::default()).await.is_empty() {
        info!("Categories already exist, skipping demo seed");
        return Ok(SeedSummary::default());
    }

    let base_year = planning_year - 1;
    let mut summary = SeedSummary::default();
    let mut actuals = Vec::new();

    for (parent_name, children, category_type) in DEMO_TREE {
        let parent = repos
            .categories
            .create(CreateCategoryInput {
                name: (*parent_name).to_string(),
                category_type: *category_type,
                parent_id: None,
                department_id: None,
            })
            .await?;
        summary.categories += 1;

        for (name, monthly_base) in *children {
            let child = repos
                .categories
                .create(CreateCategoryInput {
                    name: (*name).to_string(),
                    category_type: *category_type,
                    parent_id: Some(parent.id),
                    department_id: None,
                })
                .await?;
            summary.categories += 1;

            // Spend drifts up 1% a month over the base year.
            for month in Month::all() {
                let drift = Decimal::new(100 + i64::from(month.number()) - 1, 2);
                actuals.push(MonthlyActual {
                    category_id: child.id,
                    year: base_year,
                    month,
                    amount: Decimal::from(*monthly_base) * drift,
                });
            }
        }
    }

    summary.actual_rows = actuals.len();
    repos.store.record_actuals(actuals).await;

    info!(
        categories = summary.categories,
        actual_rows = summary.actual_rows,
        base_year,
        "Demo data seeded"
    );
    Ok(summary)
}
