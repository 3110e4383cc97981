//! Price History Port (Driven Port)
//!
//! Interface for fetching daily price history from external providers.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::market_data::RawPriceFrame;

/// Market data error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketDataError {
    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Symbol not found.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// API error.
    #[error("Market data API error: {message}")]
    ApiError {
        /// Error details.
        message: String,
    },
}

/// Port for fetching daily OHLCV history from an external provider.
///
/// Implementations return the provider's table as-is; normalization happens
/// in the loader. A valid request for a range without data should produce an
/// empty frame rather than an error.
#[async_trait]
pub trait PriceHistoryPort: Send + Sync {
    /// Fetch daily rows for `ticker` in the half-open range `[start, end)`.
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceFrame, MarketDataError>;
}
