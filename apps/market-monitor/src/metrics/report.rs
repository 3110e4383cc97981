//! Report types assembling the metrics for presentation.

use chrono::NaiveDate;
use serde::Serialize;

use super::calculator::{
    compute_cumulative_performance, compute_max_drawdown, compute_outperformance,
    compute_returns, compute_rolling_volatility,
};
use super::error::MetricsError;
use crate::domain::market_data::PriceTable;
use crate::domain::performance::{
    CumulativeSeries, OutperformanceSeries, ReturnSeries, VolatilitySeries,
};

/// Metrics for a single instrument.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentPerformance {
    /// Ticker symbol.
    pub ticker: String,
    /// Number of price rows the metrics were derived from.
    pub observations: usize,
    /// Daily returns.
    pub returns: ReturnSeries,
    /// Cumulative performance.
    pub cumulative: CumulativeSeries,
    /// Rolling annualized volatility (dates without a full window omitted).
    pub rolling_volatility: VolatilitySeries,
    /// Last cumulative value (0.0 when no returns exist).
    pub cumulative_return: f64,
    /// Last rolling volatility value, if any window was complete.
    pub latest_volatility: Option<f64>,
    /// Maximum drawdown of cumulative performance (never positive).
    pub max_drawdown: f64,
}

impl InstrumentPerformance {
    /// Run the metrics engine over one price table.
    pub fn from_prices(
        ticker: impl Into<String>,
        prices: &PriceTable,
        volatility_window: usize,
    ) -> Result<Self, MetricsError> {
        let returns = compute_returns(prices);
        let rolling_volatility = compute_rolling_volatility(&returns, volatility_window)?;
        let cumulative = compute_cumulative_performance(&returns);
        let max_drawdown = compute_max_drawdown(&cumulative);

        Ok(Self {
            ticker: ticker.into(),
            observations: prices.len(),
            cumulative_return: cumulative.last_value().unwrap_or(0.0),
            latest_volatility: rolling_volatility.last_value(),
            max_drawdown,
            returns,
            cumulative,
            rolling_volatility,
        })
    }
}

/// Asset measured against a benchmark.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkComparison {
    /// Benchmark metrics.
    pub benchmark: InstrumentPerformance,
    /// Daily asset minus benchmark returns on shared dates.
    pub outperformance: OutperformanceSeries,
    /// Number of dates both return series share.
    pub aligned_days: usize,
    /// Asset cumulative return minus benchmark cumulative return.
    pub cumulative_outperformance: f64,
}

impl BenchmarkComparison {
    /// Compare an asset with its benchmark.
    #[must_use]
    pub fn new(asset: &InstrumentPerformance, benchmark: InstrumentPerformance) -> Self {
        let outperformance = compute_outperformance(&asset.returns, &benchmark.returns);
        Self {
            aligned_days: outperformance.len(),
            cumulative_outperformance: asset.cumulative_return - benchmark.cumulative_return,
            outperformance,
            benchmark,
        }
    }
}

/// Full comparison result handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    /// Inclusive window start.
    pub start: NaiveDate,
    /// Exclusive window end.
    pub end: NaiveDate,
    /// Rolling volatility window in observations.
    pub volatility_window: usize,
    /// Asset metrics.
    pub asset: InstrumentPerformance,
    /// Benchmark comparison, when a benchmark was requested.
    pub comparison: Option<BenchmarkComparison>,
}
