//! In-memory price cache with time-based expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::application::ports::{CacheKey, PriceCachePort};
use crate::domain::market_data::PriceTable;

/// Default entry lifetime (one hour - daily bars change at most once a day).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Cached table with insertion time.
#[derive(Debug, Clone)]
struct CachedTable {
    table: Arc<PriceTable>,
    stored_at: Instant,
}

/// Price cache held in process memory.
///
/// Entries older than the TTL are misses. They are evicted when read, and
/// every `put` sweeps out all expired entries.
#[derive(Debug)]
pub struct InMemoryPriceCache {
    entries: RwLock<HashMap<CacheKey, CachedTable>>,
    ttl: Duration,
}

impl InMemoryPriceCache {
    /// Create a cache with the given entry lifetime.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, cached| cached.stored_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Remove `key` if it is still expired under the write lock.
    ///
    /// A fresh `put` landing between the read and write locks is kept.
    fn evict_if_expired(&self, key: &CacheKey) -> bool {
        let mut entries = self.entries.write();
        let expired = entries
            .get(key)
            .is_some_and(|cached| cached.stored_at.elapsed() >= self.ttl);
        if expired {
            entries.remove(key);
        }
        expired
    }
}

impl Default for InMemoryPriceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl PriceCachePort for InMemoryPriceCache {
    fn get(&self, key: &CacheKey) -> Option<Arc<PriceTable>> {
        {
            let entries = self.entries.read();
            let cached = entries.get(key)?;
            if cached.stored_at.elapsed() < self.ttl {
                return Some(Arc::clone(&cached.table));
            }
        }

        if self.evict_if_expired(key) {
            tracing::debug!(%key, "Evicted expired price cache entry");
        }
        None
    }

    fn put(&self, key: CacheKey, table: Arc<PriceTable>) {
        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired price cache entries");
        }
        self.entries.write().insert(
            key,
            CachedTable {
                table,
                stored_at: Instant::now(),
            },
        );
    }

    fn invalidate(&self, key: &CacheKey) {
        self.entries.write().remove(key);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn key(ticker: &str) -> CacheKey {
        CacheKey::new(
            ticker,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    fn table() -> Arc<PriceTable> {
        Arc::new(PriceTable::new(Vec::new()).unwrap())
    }

    #[test]
    fn test_cache_ttl_default() {
        assert_eq!(InMemoryPriceCache::default().ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn stores_and_returns_same_table() {
        let cache = InMemoryPriceCache::default();
        let stored = table();
        cache.put(key("SAP.DE"), Arc::clone(&stored));

        let Some(hit) = cache.get(&key("SAP.DE")) else {
            panic!("expected cache hit");
        };
        assert!(Arc::ptr_eq(&hit, &stored));
        assert!(cache.get(&key("RHM.DE")).is_none());
    }

    #[test]
    fn range_is_part_of_the_key() {
        let cache = InMemoryPriceCache::default();
        cache.put(key("SAP.DE"), table());

        let other_range = CacheKey::new(
            "SAP.DE",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );
        assert!(cache.get(&other_range).is_none());
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache = InMemoryPriceCache::new(Duration::ZERO);
        cache.put(key("SAP.DE"), table());
        assert_eq!(cache.len(), 1);

        assert!(cache.get(&key("SAP.DE")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn put_sweeps_expired_entries_never_read_again() {
        let cache = InMemoryPriceCache::new(Duration::ZERO);
        cache.put(key("SAP.DE"), table());
        cache.put(key("RHM.DE"), table());
        cache.put(key("ALV.DE"), table());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn eviction_keeps_fresh_entry() {
        let cache = InMemoryPriceCache::default();
        cache.put(key("SAP.DE"), table());

        assert!(!cache.evict_if_expired(&key("SAP.DE")));
        assert!(cache.get(&key("SAP.DE")).is_some());
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = InMemoryPriceCache::default();
        cache.put(key("SAP.DE"), table());
        cache.put(key("RHM.DE"), table());

        cache.invalidate(&key("SAP.DE"));
        assert!(cache.get(&key("SAP.DE")).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
