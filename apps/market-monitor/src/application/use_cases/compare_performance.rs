//! Compare Performance Use Case
//!
//! Loads an asset and an optional benchmark, then runs the metrics engine
//! over both and assembles a [`PerformanceReport`].

use chrono::NaiveDate;
use thiserror::Error;

use super::load_market_data::{LoadError, LoadMarketDataUseCase};
use crate::application::ports::{PriceCachePort, PriceHistoryPort};
use crate::metrics::{
    BenchmarkComparison, DEFAULT_VOLATILITY_WINDOW, InstrumentPerformance, MetricsError,
    PerformanceReport, format_pct, validate_window,
};

/// What to compare, over which window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRequest {
    /// Asset ticker.
    pub asset: String,
    /// Benchmark ticker, if any.
    pub benchmark: Option<String>,
    /// Inclusive start date.
    pub start: NaiveDate,
    /// Exclusive end date.
    pub end: NaiveDate,
    /// Rolling volatility window in observations.
    pub volatility_window: usize,
}

impl ComparisonRequest {
    /// Request for an asset alone with the default volatility window.
    pub fn new(asset: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            asset: asset.into(),
            benchmark: None,
            start,
            end,
            volatility_window: DEFAULT_VOLATILITY_WINDOW,
        }
    }

    /// Compare against a benchmark.
    #[must_use]
    pub fn with_benchmark(mut self, benchmark: impl Into<String>) -> Self {
        self.benchmark = Some(benchmark.into());
        self
    }

    /// Set the rolling volatility window.
    #[must_use]
    pub const fn with_volatility_window(mut self, window: usize) -> Self {
        self.volatility_window = window;
        self
    }
}

/// Errors from building a performance report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Loading prices failed; no metric was computed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A metrics parameter was invalid.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Use case for comparing an asset with a benchmark.
pub struct ComparePerformanceUseCase<P, C>
where
    P: PriceHistoryPort,
    C: PriceCachePort,
{
    loader: LoadMarketDataUseCase<P, C>,
}

impl<P, C> ComparePerformanceUseCase<P, C>
where
    P: PriceHistoryPort,
    C: PriceCachePort,
{
    /// Create a new `ComparePerformanceUseCase`.
    pub const fn new(loader: LoadMarketDataUseCase<P, C>) -> Self {
        Self { loader }
    }

    /// Build the report.
    ///
    /// The window is validated before any load. Asset and benchmark are
    /// loaded concurrently; either failure aborts the request.
    pub async fn execute(
        &self,
        request: &ComparisonRequest,
    ) -> Result<PerformanceReport, ReportError> {
        validate_window(request.volatility_window)?;

        let (start, end) = (request.start, request.end);
        let asset_ticker = request.asset.trim();
        let benchmark_ticker = request.benchmark.as_deref().map(str::trim);

        let (asset_prices, benchmark_prices) = match benchmark_ticker {
            Some(benchmark) => {
                let (asset, bench) = tokio::try_join!(
                    self.loader.execute(asset_ticker, start, end),
                    self.loader.execute(benchmark, start, end),
                )?;
                (asset, Some((benchmark, bench)))
            }
            None => (self.loader.execute(asset_ticker, start, end).await?, None),
        };

        let asset =
            InstrumentPerformance::from_prices(asset_ticker, &asset_prices, request.volatility_window)?;

        let comparison = benchmark_prices
            .map(|(ticker, prices)| {
                InstrumentPerformance::from_prices(ticker, &prices, request.volatility_window)
                    .map(|benchmark| BenchmarkComparison::new(&asset, benchmark))
            })
            .transpose()?;

        tracing::info!(
            asset = asset_ticker,
            cumulative_return = %format_pct(asset.cumulative_return),
            max_drawdown = %format_pct(asset.max_drawdown),
            outperformance = ?comparison
                .as_ref()
                .map(|c| format_pct(c.cumulative_outperformance)),
            "Performance report ready"
        );

        Ok(PerformanceReport {
            start,
            end,
            volatility_window: request.volatility_window,
            asset,
            comparison,
        })
    }
}
