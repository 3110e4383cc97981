//! Load Market Data Use Case
//!
//! Fetches one ticker's daily history through the provider port, normalizes
//! it into a canonical price table and stores it in the injected cache.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::application::ports::{CacheKey, MarketDataError, PriceCachePort, PriceHistoryPort};
use crate::domain::market_data::{FrameError, PriceTable, normalize_frame};

/// Errors from loading market data.
///
/// Every variant is fatal to the current request; nothing is retried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Ticker is empty.
    #[error("Ticker must be a non-empty symbol")]
    InvalidTicker,

    /// The provider returned no usable rows for the ticker and range.
    #[error("No data returned for ticker {ticker}")]
    NoData {
        /// Requested ticker.
        ticker: String,
    },

    /// The provider response could not be mapped onto OHLCV columns.
    #[error("Unrecognized price data for ticker {ticker}: {reason}")]
    UnrecognizedShape {
        /// Requested ticker.
        ticker: String,
        /// Why normalization failed.
        reason: FrameError,
    },

    /// The provider call itself failed.
    #[error(transparent)]
    Provider(#[from] MarketDataError),
}

/// Use case for loading a canonical price table.
pub struct LoadMarketDataUseCase<P, C>
where
    P: PriceHistoryPort,
    C: PriceCachePort,
{
    provider: Arc<P>,
    cache: Arc<C>,
}

impl<P, C> LoadMarketDataUseCase<P, C>
where
    P: PriceHistoryPort,
    C: PriceCachePort,
{
    /// Create a new `LoadMarketDataUseCase`.
    pub const fn new(provider: Arc<P>, cache: Arc<C>) -> Self {
        Self { provider, cache }
    }

    /// Load `ticker` over the half-open range `[start, end)`.
    ///
    /// `start < end` is not checked; an inverted range is expected to come
    /// back empty from the provider and fail with [`LoadError::NoData`].
    pub async fn execute(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<PriceTable>, LoadError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(LoadError::InvalidTicker);
        }

        let key = CacheKey::new(ticker, start, end);
        if let Some(table) = self.cache.get(&key) {
            tracing::debug!(%key, rows = table.len(), "Price cache hit");
            return Ok(table);
        }

        let frame = self
            .provider
            .fetch_daily_history(ticker, start, end)
            .await
            .inspect_err(|e| tracing::warn!(ticker, error = %e, "Price provider request failed"))?;

        let table = normalize_frame(ticker, &frame).map_err(|reason| match reason {
            FrameError::NoRows => LoadError::NoData {
                ticker: ticker.to_string(),
            },
            reason => LoadError::UnrecognizedShape {
                ticker: ticker.to_string(),
                reason,
            },
        });

        let table = match table {
            Ok(table) => Arc::new(table),
            Err(e) => {
                tracing::warn!(ticker, %start, %end, error = %e, "Price history rejected");
                return Err(e);
            }
        };

        tracing::info!(
            ticker,
            %start,
            %end,
            raw_rows = frame.row_count(),
            rows = table.len(),
            nested_columns = frame.has_nested_columns(),
            "Loaded price history"
        );

        self.cache.put(key, Arc::clone(&table));
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::application::ports::NoOpPriceCache;
    use crate::domain::market_data::{CanonicalField, ColumnLabel, RawPriceFrame};
    use crate::infrastructure::cache::InMemoryPriceCache;

    #[derive(Default)]
    struct StubProvider {
        frames: HashMap<String, RawPriceFrame>,
        failure: Option<MarketDataError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceHistoryPort for StubProvider {
        async fn fetch_daily_history(
            &self,
            ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<RawPriceFrame, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.failure {
                return Err(err.clone());
            }
            Ok(self.frames.get(ticker).cloned().unwrap_or_default())
        }
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
    }

    fn nested_frame(ticker: &str, closes: &[Option<f64>]) -> RawPriceFrame {
        let index = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .iter_days()
            .take(closes.len())
            .collect();
        let mut frame = RawPriceFrame::new(index);
        for field in CanonicalField::ALL {
            let values = if field == CanonicalField::Close {
                closes.to_vec()
            } else {
                vec![Some(1.0); closes.len()]
            };
            frame = frame.with_column(ColumnLabel::nested([field.label(), ticker]), values);
        }
        frame
    }

    fn provider_with(ticker: &str, frame: RawPriceFrame) -> Arc<StubProvider> {
        let mut frames = HashMap::new();
        frames.insert(ticker.to_string(), frame);
        Arc::new(StubProvider {
            frames,
            ..StubProvider::default()
        })
    }

    #[tokio::test]
    async fn loads_nested_frame_into_canonical_table() {
        let provider = provider_with("RHM.DE", nested_frame("RHM.DE", &[Some(100.0), None, Some(101.0)]));
        let loader = LoadMarketDataUseCase::new(provider, Arc::new(NoOpPriceCache));
        let (start, end) = range();

        let table = loader.execute("RHM.DE", start, end).await.unwrap();

        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn empty_response_is_no_data() {
        let loader = LoadMarketDataUseCase::new(
            Arc::new(StubProvider::default()),
            Arc::new(NoOpPriceCache),
        );
        let (start, end) = range();

        let err = loader.execute("NOPE", start, end).await.unwrap_err();

        assert_eq!(
            err,
            LoadError::NoData {
                ticker: "NOPE".to_string()
            }
        );
    }

    #[tokio::test]
    async fn all_null_response_is_no_data() {
        let provider = provider_with("SAP.DE", nested_frame("SAP.DE", &[None, None]));
        let loader = LoadMarketDataUseCase::new(provider, Arc::new(NoOpPriceCache));
        let (start, end) = range();

        let err = loader.execute("SAP.DE", start, end).await.unwrap_err();

        assert!(matches!(err, LoadError::NoData { .. }));
    }

    #[tokio::test]
    async fn missing_columns_are_unrecognized() {
        let frame = RawPriceFrame::new(vec![range().0])
            .with_column(ColumnLabel::flat("Close"), vec![Some(1.0)]);
        let loader = LoadMarketDataUseCase::new(provider_with("SAP.DE", frame), Arc::new(NoOpPriceCache));
        let (start, end) = range();

        let err = loader.execute("SAP.DE", start, end).await.unwrap_err();

        assert!(matches!(
            err,
            LoadError::UnrecognizedShape {
                reason: FrameError::MissingField(CanonicalField::Open),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn blank_ticker_is_rejected_before_provider_call() {
        let provider = Arc::new(StubProvider::default());
        let loader = LoadMarketDataUseCase::new(Arc::clone(&provider), Arc::new(NoOpPriceCache));
        let (start, end) = range();

        let err = loader.execute("   ", start, end).await.unwrap_err();

        assert_eq!(err, LoadError::InvalidTicker);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let provider = Arc::new(StubProvider {
            failure: Some(MarketDataError::RateLimited {
                retry_after_secs: 30,
            }),
            ..StubProvider::default()
        });
        let loader = LoadMarketDataUseCase::new(provider, Arc::new(NoOpPriceCache));
        let (start, end) = range();

        let err = loader.execute("SAP.DE", start, end).await.unwrap_err();

        assert!(matches!(
            err,
            LoadError::Provider(MarketDataError::RateLimited { .. })
        ));
    }

    #[tokio::test]
    async fn cached_table_skips_provider() {
        let provider = provider_with("SAP.DE", nested_frame("SAP.DE", &[Some(1.0), Some(2.0)]));
        let cache = Arc::new(InMemoryPriceCache::default());
        let loader = LoadMarketDataUseCase::new(Arc::clone(&provider), Arc::clone(&cache));
        let (start, end) = range();

        let first = loader.execute("SAP.DE", start, end).await.unwrap();
        let second = loader.execute("SAP.DE", start, end).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        cache.invalidate(&CacheKey::new("SAP.DE", start, end));
        loader.execute("SAP.DE", start, end).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let provider = Arc::new(StubProvider::default());
        let cache = Arc::new(InMemoryPriceCache::default());
        let loader = LoadMarketDataUseCase::new(Arc::clone(&provider), Arc::clone(&cache));
        let (start, end) = range();

        assert!(loader.execute("NOPE", start, end).await.is_err());
        assert!(loader.execute("NOPE", start, end).await.is_err());

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }
}
