//! Ports (Driven Interfaces)
//!
//! Outbound interfaces the use cases depend on; infrastructure provides the
//! implementations.

mod price_cache_port;
mod price_history_port;

pub use price_cache_port::{CacheKey, NoOpPriceCache, PriceCachePort};
pub use price_history_port::{MarketDataError, PriceHistoryPort};
