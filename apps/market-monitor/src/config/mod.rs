//! Configuration module for the market monitor.
//!
//! Loads YAML configuration with `${VAR}` / `${VAR:-default}` environment
//! interpolation and validates it before anything is wired up.
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_monitor::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("asset: {}", config.analysis.asset);
//! ```

mod analysis;
mod cache;
mod observability;
mod provider;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use analysis::AnalysisConfig;
pub use cache::CacheConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use provider::{ProviderConfig, RetrySettings};

use crate::metrics::MIN_VOLATILITY_WINDOW;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "MONITOR_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Price history provider.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// In-memory price cache.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Instruments and windows to analyse.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `config.yaml`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables take the default, or the empty string without one.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |caps: &regex::Captures<'_>| {
        let default_value = caps.get(2).map_or("", |m| m.as_str());
        match std::env::var(&caps[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let analysis = &config.analysis;

    if analysis.asset.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "analysis.asset must not be empty".to_string(),
        ));
    }

    if analysis
        .benchmark
        .as_deref()
        .is_some_and(|benchmark| benchmark.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "analysis.benchmark must not be blank; use null to disable the comparison".to_string(),
        ));
    }

    if analysis.lookback_days == 0 {
        return Err(ConfigError::ValidationError(
            "analysis.lookback_days must be positive".to_string(),
        ));
    }

    if analysis.volatility_window < MIN_VOLATILITY_WINDOW {
        return Err(ConfigError::ValidationError(format!(
            "analysis.volatility_window must be at least {MIN_VOLATILITY_WINDOW}"
        )));
    }

    let provider = &config.provider;
    if provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs must be positive".to_string(),
        ));
    }

    if provider.retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "provider.retry.max_attempts must be at least 1".to_string(),
        ));
    }

    let multiplier = provider.retry.multiplier;
    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(ConfigError::ValidationError(
            "provider.retry.multiplier must be a finite value >= 1.0".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}
