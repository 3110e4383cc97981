//! Formatting utilities for headline metrics display.

use super::constants::HUNDRED;

/// Format a fraction as percentage string.
#[must_use]
pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", value * HUNDRED)
}

/// Format an optional value, `N/A` when absent.
#[must_use]
pub fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}
