//! Performance metrics for asset and benchmark comparison.
//!
//! Implements the metrics engine:
//! - Daily returns (close-to-close percentage change)
//! - Cumulative performance (compounded returns)
//! - Outperformance (date-aligned return difference)
//! - Rolling volatility (annualized trailing standard deviation)
//! - Maximum drawdown (deepest fall below the running peak)
//!
//! Every operation is a pure function of its inputs.

mod calculator;
mod constants;
mod error;
mod format;
mod math;
mod report;

pub use calculator::{
    compute_cumulative_performance, compute_max_drawdown, compute_outperformance,
    compute_returns, compute_rolling_volatility, validate_window,
};
pub use constants::{DEFAULT_VOLATILITY_WINDOW, MIN_VOLATILITY_WINDOW, TRADING_DAYS_PER_YEAR};
pub use error::MetricsError;
pub use format::{format_pct, format_ratio};
pub use report::{BenchmarkComparison, InstrumentPerformance, PerformanceReport};
