//! Price History Provider Adapters
//!
//! Implementations of `PriceHistoryPort`.

pub mod yahoo;

pub use yahoo::{RetryConfig, YahooConfig, YahooError, YahooPriceHistoryAdapter};
