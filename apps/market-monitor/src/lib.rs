// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Market Monitor - Asset vs Benchmark Analytics
//!
//! Loads daily price history for an asset and an optional benchmark,
//! normalizes it into canonical OHLCV tables and derives performance and
//! risk metrics.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: price tables and dated series
//!   - `market_data`: `RawPriceFrame`, `PriceTable`, frame normalization
//!   - `performance`: `TimeSeries` and its kinds (returns, cumulative, ...)
//!
//! - **Metrics**: pure functions over domain series
//!   (returns, cumulative performance, outperformance, rolling volatility,
//!   max drawdown) plus report assembly
//!
//! - **Application**: use cases and ports
//!   - `ports`: `PriceHistoryPort`, `PriceCachePort`
//!   - `use_cases`: `LoadMarketData`, `ComparePerformance`
//!
//! - **Infrastructure**: adapters
//!   - `provider`: Yahoo Finance chart API
//!   - `cache`: in-memory TTL cache
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use market_monitor::{
//!     ComparePerformanceUseCase, ComparisonRequest, InMemoryPriceCache,
//!     LoadMarketDataUseCase, YahooConfig, YahooPriceHistoryAdapter,
//! };
//!
//! let provider = Arc::new(YahooPriceHistoryAdapter::new(&YahooConfig::default())?);
//! let loader = LoadMarketDataUseCase::new(provider, Arc::new(InMemoryPriceCache::default()));
//! let report = ComparePerformanceUseCase::new(loader)
//!     .execute(&ComparisonRequest::new("RHM.DE", start, end).with_benchmark("^GDAXI"))
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - price tables and series with no external dependencies.
pub mod domain;

/// Metrics engine - stateless calculations over domain series.
pub mod metrics;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Ambient Modules
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::market_data::{
    CanonicalField, ColumnLabel, FrameError, PriceBar, PriceTable, PriceTableError, RawColumn,
    RawPriceFrame, normalize_frame,
};
pub use domain::performance::{
    CumulativeSeries, OutperformanceSeries, ReturnSeries, SeriesError, SeriesPoint, TimeSeries,
    VolatilitySeries,
};

pub use metrics::{
    BenchmarkComparison, InstrumentPerformance, MetricsError, PerformanceReport,
    compute_cumulative_performance, compute_max_drawdown, compute_outperformance,
    compute_returns, compute_rolling_volatility, format_pct,
};

pub use application::ports::{
    CacheKey, MarketDataError, NoOpPriceCache, PriceCachePort, PriceHistoryPort,
};
pub use application::use_cases::{
    ComparePerformanceUseCase, ComparisonRequest, LoadError, LoadMarketDataUseCase, ReportError,
};

pub use infrastructure::cache::InMemoryPriceCache;
pub use infrastructure::provider::{YahooConfig, YahooError, YahooPriceHistoryAdapter};

pub use config::{Config, ConfigError, load_config, load_config_from_string};
