//! Market Monitor Binary
//!
//! Compares an asset against a benchmark over a trailing window and prints
//! the performance report as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin market-monitor
//! ```
//!
//! # Environment Variables
//!
//! - `MONITOR_CONFIG`: config file path (default: config.yaml; built-in
//!   defaults when the default file is absent)
//! - `RUST_LOG`: log filter (default: `observability.logging.level`)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use market_monitor::config::{self, CONFIG_PATH_ENV, Config, ConfigError};
use market_monitor::metrics::format_ratio;
use market_monitor::{
    ComparePerformanceUseCase, ComparisonRequest, InMemoryPriceCache, LoadMarketDataUseCase,
    NoOpPriceCache, PriceCachePort, PriceHistoryPort, YahooConfig, YahooPriceHistoryAdapter,
    format_pct,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let config = load_config()?;
    market_monitor::telemetry::init_tracing(&config.observability.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
    tracing::info!(
        asset = %config.analysis.asset,
        benchmark = config.analysis.benchmark.as_deref().unwrap_or("none"),
        lookback_days = config.analysis.lookback_days,
        cache_enabled = config.cache.enabled,
        "Starting market monitor"
    );

    let provider = Arc::new(
        YahooPriceHistoryAdapter::new(&YahooConfig::from(&config.provider))
            .context("failed to build price history adapter")?,
    );

    if config.cache.enabled {
        let cache = InMemoryPriceCache::new(Duration::from_secs(config.cache.ttl_secs));
        run(&config, provider, Arc::new(cache)).await
    } else {
        run(&config, provider, Arc::new(NoOpPriceCache)).await
    }
}

/// Load the config file named by `MONITOR_CONFIG`, or `config.yaml`.
///
/// A missing default file falls back to built-in defaults; an explicitly
/// named file must exist.
fn load_config() -> anyhow::Result<Config> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => config::load_config(Some(&path))
            .with_context(|| format!("failed to load config from {CONFIG_PATH_ENV}={path}")),
        Err(_) => match config::load_config(None) {
            Err(ConfigError::ReadError { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(Config::default())
            }
            other => other.context("failed to load config.yaml"),
        },
    }
}

async fn run<P, C>(config: &Config, provider: Arc<P>, cache: Arc<C>) -> anyhow::Result<()>
where
    P: PriceHistoryPort,
    C: PriceCachePort,
{
    let analysis = &config.analysis;
    let today = chrono::Utc::now().date_naive();
    let (start, end) = analysis.date_range(today);

    let mut request = ComparisonRequest::new(analysis.asset.clone(), start, end)
        .with_volatility_window(analysis.volatility_window);
    if let Some(benchmark) = &analysis.benchmark {
        request = request.with_benchmark(benchmark.clone());
    }

    let use_case = ComparePerformanceUseCase::new(LoadMarketDataUseCase::new(provider, cache));
    let report = use_case
        .execute(&request)
        .await
        .with_context(|| format!("failed to analyse {}", request.asset))?;

    tracing::info!(
        asset = %report.asset.ticker,
        cumulative_return = %format_pct(report.asset.cumulative_return),
        latest_volatility = %format_ratio(report.asset.latest_volatility),
        max_drawdown = %format_pct(report.asset.max_drawdown),
        "Asset summary"
    );
    if let Some(comparison) = &report.comparison {
        tracing::info!(
            benchmark = %comparison.benchmark.ticker,
            benchmark_return = %format_pct(comparison.benchmark.cumulative_return),
            outperformance = %format_pct(comparison.cumulative_outperformance),
            aligned_days = comparison.aligned_days,
            "Benchmark summary"
        );
    }

    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}
