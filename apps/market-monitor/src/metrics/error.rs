//! Metrics engine errors.

use thiserror::Error;

/// Errors from the metrics engine.
///
/// Short or empty inputs are not errors; they produce empty results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// A caller-supplied parameter violates its precondition.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
