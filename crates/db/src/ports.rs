//! Boundary contracts for the external category and actuals feeds.
//!
//! Repositories only reach categories and ledger actuals through these
//! traits. `MemoryStore` implements both, so a single store can serve a
//! whole deployment; tests swap in failing or counting sources.

use async_trait::async_trait;
use budgetwise_core::category::{Category, CategoryFilter};
use budgetwise_core::forecast::{ForecastError, MonthlyActual};
use budgetwise_core::variance::VarianceError;
use budgetwise_shared::types::CategoryId;
use thiserror::Error;

use crate::store::MemoryStore;

/// A source call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name} unavailable: {message}")]
pub struct SourceError {
    /// Which source failed.
    pub source_name: &'static str,
    /// What went wrong.
    pub message: String,
}

impl SourceError {
    /// Creates a source error.
    pub fn new(source_name: &'static str, message: impl Into<String>) -> Self {
        Self {
            source_name,
            message: message.into(),
        }
    }
}

impl From<SourceError> for ForecastError {
    fn from(err: SourceError) -> Self {
        Self::Source(err.to_string())
    }
}

impl From<SourceError> for VarianceError {
    fn from(err: SourceError) -> Self {
        Self::Source(err.to_string())
    }
}

/// Supplies the category list.
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// Categories passing `filter`.
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>, SourceError>;
}

/// Supplies historical ledger actuals.
#[async_trait]
pub trait ActualsSource: Send + Sync {
    /// Monthly actuals of one category in one year.
    async fn list_actuals(
        &self,
        category_id: CategoryId,
        year: i32,
    ) -> Result<Vec<MonthlyActual>, SourceError>;
}

#[async_trait]
impl CategorySource for MemoryStore {
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>, SourceError> {
        Ok(self.read().await.categories(filter))
    }
}

#[async_trait]
impl ActualsSource for MemoryStore {
    async fn list_actuals(
        &self,
        category_id: CategoryId,
        year: i32,
    ) -> Result<Vec<MonthlyActual>, SourceError> {
        let mut rows: Vec<MonthlyActual> = self
            .read()
            .await
            .actuals
            .iter()
            .filter(|a| a.category_id == category_id && a.year == year)
            .copied()
            .collect();
        rows.sort_by_key(|a| a.month);
        Ok(rows)
    }
}
