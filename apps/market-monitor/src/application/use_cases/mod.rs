//! Application Use Cases
//!
//! - `LoadMarketDataUseCase`: provider -> normalization -> canonical price table
//! - `ComparePerformanceUseCase`: asset/benchmark loads -> metrics report

mod compare_performance;
mod load_market_data;

pub use compare_performance::{ComparePerformanceUseCase, ComparisonRequest, ReportError};
pub use load_market_data::{LoadError, LoadMarketDataUseCase};
