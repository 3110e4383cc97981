//! Canonical daily price table.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The five canonical OHLCV fields, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    /// Opening price.
    Open,
    /// Session high.
    High,
    /// Session low.
    Low,
    /// Closing price.
    Close,
    /// Traded volume.
    Volume,
}

impl CanonicalField {
    /// All canonical fields in table order.
    pub const ALL: [Self; 5] = [Self::Open, Self::High, Self::Low, Self::Close, Self::Volume];

    /// Column label used by price providers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Decimal,
    /// Session high.
    pub high: Decimal,
    /// Session low.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: Decimal,
}

/// Violations of the price table invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceTableError {
    /// Two bars share a date.
    #[error("duplicate date {date}")]
    DuplicateDate {
        /// The repeated date.
        date: NaiveDate,
    },

    /// Dates are not increasing.
    #[error("dates out of order: {current} follows {previous}")]
    UnorderedDates {
        /// Date of the earlier bar.
        previous: NaiveDate,
        /// Date of the offending bar.
        current: NaiveDate,
    },

    /// Volume below zero.
    #[error("negative volume on {date}")]
    NegativeVolume {
        /// Date of the offending bar.
        date: NaiveDate,
    },

    /// Close at or below zero, which makes returns undefined.
    #[error("non-positive close on {date}")]
    NonPositiveClose {
        /// Date of the offending bar.
        date: NaiveDate,
    },
}

/// Ordered daily OHLCV observations with unique, strictly increasing dates.
///
/// Immutable once built; the only constructor validates every invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceTable {
    bars: Vec<PriceBar>,
}

impl PriceTable {
    /// Build a table from bars already in date order.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, PriceTableError> {
        for pair in bars.windows(2) {
            let (previous, current) = (pair[0].date, pair[1].date);
            if current == previous {
                return Err(PriceTableError::DuplicateDate { date: current });
            }
            if current < previous {
                return Err(PriceTableError::UnorderedDates { previous, current });
            }
        }

        for bar in &bars {
            if bar.volume < Decimal::ZERO {
                return Err(PriceTableError::NegativeVolume { date: bar.date });
            }
            if bar.close <= Decimal::ZERO {
                return Err(PriceTableError::NonPositiveClose { date: bar.date });
            }
        }

        Ok(Self { bars })
    }

    /// All bars in date order.
    #[must_use]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the table has no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Earliest bar.
    #[must_use]
    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    /// Most recent bar.
    #[must_use]
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Iterate over bars in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }
}

impl<'a> IntoIterator for &'a PriceTable {
    type Item = &'a PriceBar;
    type IntoIter = std::slice::Iter<'a, PriceBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: i64) -> PriceBar {
        let close = Decimal::new(close, 0);
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::new(1_000, 0),
        }
    }

    #[test]
    fn accepts_strictly_increasing_dates() {
        let table = PriceTable::new(vec![bar(2, 100), bar(3, 101), bar(5, 99)]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.last().map(|b| b.close), Some(Decimal::new(99, 0)));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceTable::new(vec![bar(2, 100), bar(2, 101)]).unwrap_err();
        assert!(matches!(err, PriceTableError::DuplicateDate { .. }));
    }

    #[test]
    fn rejects_unordered_dates() {
        let err = PriceTable::new(vec![bar(3, 100), bar(2, 101)]).unwrap_err();
        assert!(matches!(err, PriceTableError::UnorderedDates { .. }));
    }

    #[test]
    fn rejects_negative_volume() {
        let mut b = bar(2, 100);
        b.volume = Decimal::new(-1, 0);
        let err = PriceTable::new(vec![b]).unwrap_err();
        assert!(matches!(err, PriceTableError::NegativeVolume { .. }));
    }

    #[test]
    fn rejects_zero_close() {
        let err = PriceTable::new(vec![bar(2, 0)]).unwrap_err();
        assert!(matches!(err, PriceTableError::NonPositiveClose { .. }));
    }

    #[test]
    fn empty_table_is_valid() {
        let table = PriceTable::new(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert!(table.first().is_none());
    }

    #[test]
    fn canonical_field_labels_in_order() {
        let labels: Vec<_> = CanonicalField::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, vec!["Open", "High", "Low", "Close", "Volume"]);
    }
}
