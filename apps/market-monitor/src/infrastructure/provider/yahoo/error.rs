//! Yahoo-specific error types.

use thiserror::Error;

use crate::application::ports::MarketDataError;

/// Errors from the Yahoo adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum YahooError {
    /// HTTP client could not be built or the URL is unusable.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Network error (retryable).
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the chart schema.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Unknown or delisted symbol.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// Requested symbol.
        symbol: String,
    },

    /// API returned an error.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code from the API.
        code: String,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
    },

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
    },
}

impl From<YahooError> for MarketDataError {
    fn from(err: YahooError) -> Self {
        match err {
            YahooError::Http(message) | YahooError::Network(message) => {
                Self::ConnectionError { message }
            }
            YahooError::MaxRetriesExceeded { attempts } => Self::ConnectionError {
                message: format!("Max retries exceeded after {attempts} attempts"),
            },
            YahooError::SymbolNotFound { symbol } => Self::SymbolNotFound { symbol },
            YahooError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            YahooError::JsonParse(message) => Self::ApiError {
                message: format!("Malformed chart response: {message}"),
            },
            YahooError::Api { code, message } => Self::ApiError {
                message: format!("{code}: {message}"),
            },
        }
    }
}
