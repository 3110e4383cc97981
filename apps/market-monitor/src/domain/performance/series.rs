//! Date-ordered value series.

use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Marker trait for the kind of values a series carries.
pub trait SeriesKind: fmt::Debug + Clone + Copy + PartialEq + Default {
    /// Human-readable kind name.
    const NAME: &'static str;
}

/// Fractional close-to-close returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Returns;

/// Compounded return since the first observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cumulative;

/// Asset return minus benchmark return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outperformance;

/// Annualized trailing volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Volatility;

impl SeriesKind for Returns {
    const NAME: &'static str = "returns";
}

impl SeriesKind for Cumulative {
    const NAME: &'static str = "cumulative";
}

impl SeriesKind for Outperformance {
    const NAME: &'static str = "outperformance";
}

impl SeriesKind for Volatility {
    const NAME: &'static str = "volatility";
}

/// Daily returns derived from a price table.
pub type ReturnSeries = TimeSeries<Returns>;
/// Compounded performance derived from returns.
pub type CumulativeSeries = TimeSeries<Cumulative>;
/// Date-aligned return differences.
pub type OutperformanceSeries = TimeSeries<Outperformance>;
/// Rolling volatility; dates without a full window are absent.
pub type VolatilitySeries = TimeSeries<Volatility>;

/// A single dated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Observation value.
    pub value: f64,
}

impl SeriesPoint {
    /// Create a point.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Series construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// Dates are not strictly increasing.
    #[error("{kind} series dates not strictly increasing: {current} follows {previous}")]
    UnorderedDates {
        /// Series kind.
        kind: &'static str,
        /// Earlier date.
        previous: NaiveDate,
        /// Offending date.
        current: NaiveDate,
    },

    /// A value is NaN or infinite.
    #[error("{kind} series has a non-finite value on {date}")]
    NonFinite {
        /// Series kind.
        kind: &'static str,
        /// Offending date.
        date: NaiveDate,
    },
}

/// Ordered sequence of dated values with strictly increasing dates.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<K: SeriesKind> {
    points: Vec<SeriesPoint>,
    kind: PhantomData<K>,
}

impl<K: SeriesKind> TimeSeries<K> {
    /// Empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            points: Vec::new(),
            kind: PhantomData,
        }
    }

    /// Build a series, validating ordering and finiteness.
    pub fn new(points: Vec<SeriesPoint>) -> Result<Self, SeriesError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::UnorderedDates {
                    kind: K::NAME,
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }
        if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(SeriesError::NonFinite {
                kind: K::NAME,
                date: bad.date,
            });
        }
        Ok(Self::from_ordered(points))
    }

    /// Build a series from `(date, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, value)| SeriesPoint::new(date, value))
                .collect(),
        )
    }

    /// Wrap points whose dates are known to be strictly increasing.
    pub(crate) const fn from_ordered(points: Vec<SeriesPoint>) -> Self {
        Self {
            points,
            kind: PhantomData,
        }
    }

    /// All points in date order.
    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest point.
    #[must_use]
    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    /// Most recent point.
    #[must_use]
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Most recent value.
    #[must_use]
    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// Iterate over values in date order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Iterate over dates in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Iterate over points in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, SeriesPoint> {
        self.points.iter()
    }
}

impl<K: SeriesKind> Default for TimeSeries<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, K: SeriesKind> IntoIterator for &'a TimeSeries<K> {
    type Item = &'a SeriesPoint;
    type IntoIter = std::slice::Iter<'a, SeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<K: SeriesKind> Serialize for TimeSeries<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn last_value_is_most_recent() {
        let series = ReturnSeries::from_pairs([(day(1), 0.01), (day(2), -0.02)]).unwrap();
        assert_eq!(series.last_value(), Some(-0.02));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn rejects_repeated_dates() {
        let err = CumulativeSeries::from_pairs([(day(1), 0.0), (day(1), 0.1)]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::UnorderedDates {
                kind: "cumulative",
                ..
            }
        ));
    }

    #[test]
    fn rejects_nan() {
        let err = ReturnSeries::from_pairs([(day(1), f64::NAN)]).unwrap_err();
        assert!(matches!(err, SeriesError::NonFinite { .. }));
    }

    #[test]
    fn empty_series_has_no_last_value() {
        let series = VolatilitySeries::empty();
        assert!(series.is_empty());
        assert_eq!(series.last_value(), None);
    }

    #[test]
    fn serializes_as_point_list() {
        let series = ReturnSeries::from_pairs([(day(3), 0.5)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"[{"date":"2024-05-03","value":0.5}]"#);
    }
}
