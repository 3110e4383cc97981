//! Statistical math utilities for performance metric calculations.

use super::constants::TRADING_DAYS_PER_YEAR;

/// Calculate mean of a slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate sample standard deviation (divides by n - 1).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let variance_sum: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    let variance = variance_sum / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Factor converting daily volatility to annual volatility.
pub fn annualization_factor() -> f64 {
    TRADING_DAYS_PER_YEAR.sqrt()
}
