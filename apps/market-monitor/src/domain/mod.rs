//! Domain Layer
//!
//! Pure value types with no I/O:
//! - `market_data`: canonical daily price tables and raw provider frames
//! - `performance`: typed, date-ordered series derived from prices

pub mod market_data;
pub mod performance;
