//! Analysis request defaults.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::metrics::DEFAULT_VOLATILITY_WINDOW;

/// Which instruments to compare and over how long.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Asset ticker.
    #[serde(default = "default_asset")]
    pub asset: String,
    /// Benchmark ticker; `None` analyses the asset alone.
    #[serde(default = "default_benchmark")]
    pub benchmark: Option<String>,
    /// Calendar days to look back from today.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Rolling volatility window in observations.
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
}

impl AnalysisConfig {
    /// Half-open `[today - lookback_days, today + 1)` so today's bar is included.
    #[must_use]
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = today - Duration::days(i64::from(self.lookback_days));
        let end = today.succ_opt().unwrap_or(today);
        (start, end)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            asset: default_asset(),
            benchmark: default_benchmark(),
            lookback_days: default_lookback_days(),
            volatility_window: default_volatility_window(),
        }
    }
}

fn default_asset() -> String {
    "RHM.DE".to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_benchmark() -> Option<String> {
    Some("^GDAXI".to_string())
}

const fn default_lookback_days() -> u32 {
    365
}

const fn default_volatility_window() -> usize {
    DEFAULT_VOLATILITY_WINDOW
}
