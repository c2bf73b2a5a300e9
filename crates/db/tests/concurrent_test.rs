//! Concurrent access tests for plan writes and workflow transitions.
//!
//! These tests verify that:
//! - Concurrent upserts on one (version, category, month) key never duplicate
//! - Racing transitions from the same status let exactly one through
//! - Concurrent writes to distinct keys all land

use std::sync::Arc;

use budgetwise_core::category::{Category, CategoryType, CreateCategoryInput};
use budgetwise_core::plan::{
    BudgetVersion, CalculationMethod, CreateVersionInput, UpsertPlanDetailInput,
};
use budgetwise_core::workflow::{VersionStatus, WorkflowError};
use budgetwise_db::repositories::TransitionInput;
use budgetwise_db::{MemoryStore, Repositories};
use budgetwise_shared::PlanningConfig;
use budgetwise_shared::types::UserId;
use futures::future::join_all;
use rust_decimal::Decimal;
use tokio::sync::Barrier;

struct ConcurrentTestData {
    repos: Repositories,
    user: UserId,
    leaf: Category,
    version: BudgetVersion,
}

async fn setup_concurrent_test_data() -> ConcurrentTestData {
    let repos = Repositories::new(MemoryStore::new(), &PlanningConfig::default()).unwrap();
    let user = UserId::new();
    let leaf = repos
        .categories
        .create(CreateCategoryInput {
            name: "Cloud".to_string(),
            category_type: CategoryType::Opex,
            parent_id: None,
            department_id: None,
        })
        .await
        .unwrap();
    let version = repos
        .versions
        .create(CreateVersionInput {
            year: 2025,
            name: "Concurrent".to_string(),
            currency: None,
            created_by: user,
            copy_from: None,
        })
        .await
        .unwrap();
    ConcurrentTestData {
        repos,
        user,
        leaf,
        version,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_same_key_never_duplicate() {
    let data = setup_concurrent_test_data().await;
    let tasks = 100;
    let barrier = Arc::new(Barrier::new(tasks));

    let handles = (1..=tasks).map(|i| {
        let details = data.repos.details.clone();
        let barrier = barrier.clone();
        let version_id = data.version.id;
        let input = UpsertPlanDetailInput {
            category_id: data.leaf.id,
            month: 7,
            amount: Decimal::from(i),
            method: CalculationMethod::Manual,
            based_on_year: None,
        };
        let user = data.user;
        tokio::spawn(async move {
            barrier.wait().await;
            details.upsert(version_id, &input, user).await
        })
    });

    let results = join_all(handles).await;
    for result in results {
        result.unwrap().unwrap();
    }

    let rows = data.repos.details.get_by_version(data.version.id).await.unwrap();
    assert_eq!(rows.len(), 1, "one row per (version, category, month)");
    assert!(rows[0].amount >= Decimal::ONE && rows[0].amount <= Decimal::from(tasks));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_distinct_months_all_land() {
    let data = setup_concurrent_test_data().await;

    let writes = (1..=12u8).map(|month| {
        let details = data.repos.details.clone();
        let version_id = data.version.id;
        let input = UpsertPlanDetailInput {
            category_id: data.leaf.id,
            month,
            amount: Decimal::from(100),
            method: CalculationMethod::Manual,
            based_on_year: None,
        };
        let user = data.user;
        async move { details.upsert(version_id, &input, user).await }
    });
    for result in join_all(writes).await {
        result.unwrap();
    }

    let totals = data.repos.details.sum_monthly(data.version.id).await.unwrap();
    assert_eq!(totals.annual_total, Decimal::from(1200));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_reviews_let_exactly_one_through() {
    let data = setup_concurrent_test_data().await;
    let workflow = data.repos.workflow.clone();
    workflow
        .submit(data.version.id, TransitionInput::by(data.user))
        .await
        .unwrap();

    let barrier = Arc::new(Barrier::new(20));
    let handles = (0..20).map(|i| {
        let workflow = workflow.clone();
        let barrier = barrier.clone();
        let version_id = data.version.id;
        let user = data.user;
        tokio::spawn(async move {
            barrier.wait().await;
            if i % 2 == 0 {
                workflow.approve(version_id, TransitionInput::by(user)).await
            } else {
                workflow
                    .reject(version_id, TransitionInput::by(user).with_comments("No"))
                    .await
            }
        })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        WorkflowError::IllegalTransition {
            from: VersionStatus::Approved | VersionStatus::Rejected,
            ..
        }
    )));

    // Submit + the single decision.
    assert_eq!(data.repos.store.approval_log_len().await, 2);
    let version = data.repos.versions.get(data.version.id).await.unwrap();
    assert_eq!(version.row_version, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submits_open_one_iteration() {
    let data = setup_concurrent_test_data().await;

    let submits = (0..10).map(|_| {
        let workflow = data.repos.workflow.clone();
        let version_id = data.version.id;
        let user = data.user;
        async move { workflow.submit(version_id, TransitionInput::by(user)).await }
    });
    let results = join_all(submits).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let version = data.repos.versions.get(data.version.id).await.unwrap();
    assert_eq!(version.review_iteration, 1);
    assert_eq!(version.status, VersionStatus::InReview);
}
