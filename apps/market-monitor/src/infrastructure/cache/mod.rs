//! Price Cache Adapters
//!
//! In-memory implementation of `PriceCachePort`.

mod in_memory;

pub use in_memory::{DEFAULT_CACHE_TTL, InMemoryPriceCache};
