//! Raw frame normalization.
//!
//! Turns whatever column scheme a provider used into a canonical
//! [`PriceTable`]:
//! 1. multi-level labels are reduced to their outermost level
//! 2. exactly the canonical OHLCV columns are selected, in order
//! 3. rows with any missing (or non-finite) field are dropped
//!
//! Any shape that cannot be mapped onto the canonical columns is rejected.

use rust_decimal::Decimal;
use thiserror::Error;

use super::price_table::{CanonicalField, PriceBar, PriceTable, PriceTableError};
use super::raw_frame::{RawColumn, RawPriceFrame};

/// Reasons a raw frame cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The frame has no usable rows.
    #[error("frame has no usable rows")]
    NoRows,

    /// A canonical field has no column.
    #[error("missing column '{0}'")]
    MissingField(CanonicalField),

    /// More than one column maps onto the same canonical field.
    #[error("column '{0}' is ambiguous after flattening")]
    AmbiguousField(CanonicalField),

    /// A column does not have one value per index row.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Offending column label.
        column: String,
        /// Number of index rows.
        expected: usize,
        /// Number of values found.
        actual: usize,
    },

    /// The surviving rows break a table invariant.
    #[error("invalid price table: {0}")]
    InvalidTable(#[from] PriceTableError),
}

/// Normalize a raw provider frame into a canonical price table.
///
/// Both flat and nested column schemes yield a table; the flat case is not a
/// pass-through, it goes through the same selection and null-dropping.
pub fn normalize_frame(ticker: &str, frame: &RawPriceFrame) -> Result<PriceTable, FrameError> {
    if frame.is_empty() {
        return Err(FrameError::NoRows);
    }

    let expected = frame.row_count();
    for column in &frame.columns {
        if column.values.len() != expected {
            return Err(FrameError::LengthMismatch {
                column: column.label.to_string(),
                expected,
                actual: column.values.len(),
            });
        }
    }

    let [open, high, low, close, volume] = select_canonical(frame)?;

    let mut bars = Vec::with_capacity(expected);
    let mut dropped = 0usize;
    for (row, date) in frame.index.iter().enumerate() {
        let fields = (
            cell(open, row),
            cell(high, row),
            cell(low, row),
            cell(close, row),
            cell(volume, row),
        );
        match fields {
            (Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
                bars.push(PriceBar {
                    date: *date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                });
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(ticker, dropped, "Dropped rows with missing values");
    }

    if bars.is_empty() {
        return Err(FrameError::NoRows);
    }

    bars.sort_by_key(|bar| bar.date);
    Ok(PriceTable::new(bars)?)
}

/// Locate the column for each canonical field by its flattened label.
fn select_canonical(frame: &RawPriceFrame) -> Result<[&RawColumn; 5], FrameError> {
    let mut selected = [None; 5];

    for (slot, field) in selected.iter_mut().zip(CanonicalField::ALL) {
        let mut matches = frame
            .columns
            .iter()
            .filter(|c| c.label.first_level() == Some(field.label()));

        let column = matches.next().ok_or(FrameError::MissingField(field))?;
        if matches.next().is_some() {
            return Err(FrameError::AmbiguousField(field));
        }
        *slot = Some(column);
    }

    let [Some(open), Some(high), Some(low), Some(close), Some(volume)] = selected else {
        // Every slot is filled above or the function has returned.
        return Err(FrameError::MissingField(CanonicalField::Open));
    };
    Ok([open, high, low, close, volume])
}

fn cell(column: &RawColumn, row: usize) -> Option<Decimal> {
    column
        .values
        .get(row)
        .copied()
        .flatten()
        .filter(|v| v.is_finite())
        .and_then(|v| Decimal::try_from(v).ok())
}
