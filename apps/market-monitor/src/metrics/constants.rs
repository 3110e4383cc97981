//! Constants for performance metric calculations.

/// Trading days used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default trailing window for rolling volatility, in observations.
pub const DEFAULT_VOLATILITY_WINDOW: usize = 30;

/// Smallest window for which a sample standard deviation exists.
pub const MIN_VOLATILITY_WINDOW: usize = 2;

/// Fraction to percent.
pub const HUNDRED: f64 = 100.0;
