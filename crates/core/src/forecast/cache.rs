//! Baseline summary caching using Moka.
//!
//! Baselines are read from the actuals source on every forecast; the
//! cache keeps recent (category, year) summaries in memory so repeated
//! what-if calculations on the same category do not refetch.

use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use budgetwise_shared::types::CategoryId;

use super::types::BaselineSummary;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache for baseline summaries keyed by (category, year).
///
/// Thread-safe and cheap to clone; clones share storage.
#[derive(Clone)]
pub struct BaselineCache {
    cache: Cache<(CategoryId, i32), Arc<BaselineSummary>>,
}

impl BaselineCache {
    /// Creates a new cache with default settings.
    ///
    /// Default: 1000 entries max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a new cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries to cache
    /// * `ttl_secs` - Time-to-live in seconds for each entry
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Returns the cached baseline, if present.
    #[must_use]
    pub fn get(&self, category_id: CategoryId, year: i32) -> Option<BaselineSummary> {
        self.cache.get(&(category_id, year)).map(|s| *s)
    }

    /// Stores a baseline under its own (category, year).
    pub fn insert(&self, summary: BaselineSummary) {
        self.cache
            .insert((summary.category_id, summary.year), Arc::new(summary));
    }

    /// Drops the cached baseline of one category and year.
    pub fn invalidate(&self, category_id: CategoryId, year: i32) {
        self.cache.invalidate(&(category_id, year));
    }

    /// Clears all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of entries in the cache.
    ///
    /// Note: This is an approximate count due to concurrent access.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for BaselineCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BaselineCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaselineCache")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastCalculator;
    use crate::forecast::types::MonthlyActual;
    use budgetwise_shared::types::Month;
    use rust_decimal_macros::dec;

    fn summary(category_id: CategoryId, year: i32) -> BaselineSummary {
        let rows = [MonthlyActual {
            category_id,
            year,
            month: Month::JANUARY,
            amount: dec!(1200),
        }];
        ForecastCalculator::baseline(category_id, year, &rows)
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = BaselineCache::new();
        let category_id = CategoryId::new();
        assert!(cache.get(category_id, 2024).is_none());

        cache.insert(summary(category_id, 2024));
        let hit = cache.get(category_id, 2024).unwrap();
        assert_eq!(hit.total, dec!(1200));
        assert!(cache.get(category_id, 2023).is_none());
    }

    #[test]
    fn test_invalidate() {
        let cache = BaselineCache::with_config(10, 60);
        let category_id = CategoryId::new();
        cache.insert(summary(category_id, 2024));
        cache.insert(summary(category_id, 2023));

        cache.invalidate(category_id, 2024);
        assert!(cache.get(category_id, 2024).is_none());
        assert!(cache.get(category_id, 2023).is_some());

        cache.invalidate_all();
        assert!(cache.get(category_id, 2023).is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = BaselineCache::new();
        let clone = cache.clone();
        let category_id = CategoryId::new();
        clone.insert(summary(category_id, 2024));
        assert!(cache.get(category_id, 2024).is_some());
    }
}
