//! Price Cache Port (Driven Port)
//!
//! Injectable cache for loaded price tables, keyed by ticker and range.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::market_data::PriceTable;

/// Cache key: one ticker over one half-open date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Ticker symbol.
    pub ticker: String,
    /// Inclusive start.
    pub start: NaiveDate,
    /// Exclusive end.
    pub end: NaiveDate,
}

impl CacheKey {
    /// Create a key.
    pub fn new(ticker: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            start,
            end,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{})", self.ticker, self.start, self.end)
    }
}

/// Port for caching loaded price tables.
///
/// Loader correctness must not depend on the cache: a miss always falls back
/// to the provider.
pub trait PriceCachePort: Send + Sync {
    /// Look up a table; expired entries count as misses.
    fn get(&self, key: &CacheKey) -> Option<Arc<PriceTable>>;

    /// Store a table.
    fn put(&self, key: CacheKey, table: Arc<PriceTable>);

    /// Drop one entry.
    fn invalidate(&self, key: &CacheKey);

    /// Drop every entry.
    fn clear(&self);
}

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPriceCache;

impl PriceCachePort for NoOpPriceCache {
    fn get(&self, _key: &CacheKey) -> Option<Arc<PriceTable>> {
        None
    }

    fn put(&self, _key: CacheKey, _table: Arc<PriceTable>) {}

    fn invalidate(&self, _key: &CacheKey) {}

    fn clear(&self) {}
}
