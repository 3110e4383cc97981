//! Yahoo Finance Price History Adapter
//!
//! Fetches daily OHLCV bars from the Yahoo Finance v8 chart API.
//!
//! # Components
//!
//! - [`YahooPriceHistoryAdapter`]: implements `PriceHistoryPort`
//! - [`YahooConfig`] / [`RetryConfig`]: endpoint, timeout and retry policy
//! - [`YahooError`]: adapter errors, convertible into `MarketDataError`

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::YahooPriceHistoryAdapter;
pub use config::{DEFAULT_BASE_URL, RetryConfig, YahooConfig};
pub use error::YahooError;
