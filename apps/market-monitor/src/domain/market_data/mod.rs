//! Market Data Domain
//!
//! Canonical OHLCV price tables and the normalization step that turns a raw
//! provider response into one.

mod normalize;
mod price_table;
mod raw_frame;

pub use normalize::{FrameError, normalize_frame};
pub use price_table::{CanonicalField, PriceBar, PriceTable, PriceTableError};
pub use raw_frame::{ColumnLabel, RawColumn, RawPriceFrame};
