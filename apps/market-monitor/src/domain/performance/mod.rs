//! Performance Domain
//!
//! Typed series produced by the metrics engine. Each series kind is a
//! distinct type so returns cannot be fed where cumulative performance is
//! expected.

mod series;

pub use series::{
    Cumulative, CumulativeSeries, Outperformance, OutperformanceSeries, ReturnSeries, Returns,
    SeriesError, SeriesKind, SeriesPoint, TimeSeries, Volatility, VolatilitySeries,
};
