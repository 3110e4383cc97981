//! Yahoo chart API response types.
//!
//! These types map directly to the `/v8/finance/chart/{symbol}` JSON format.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::error::YahooError;
use crate::domain::market_data::{ColumnLabel, RawPriceFrame};

// ============================================================================
// Envelope
// ============================================================================

/// Top-level chart response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    /// Chart payload.
    pub chart: ChartEnvelope,
}

/// Result or error; Yahoo sets exactly one of them.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    /// Results, one per requested symbol.
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// Error payload.
    #[serde(default)]
    pub error: Option<ChartError>,
}

/// Error payload embedded in a chart response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    /// Error code, e.g. `"Not Found"`.
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ChartError {
    /// Whether the error means the symbol does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }

    /// Convert into an adapter error for `symbol`.
    pub fn into_error(self, symbol: &str) -> YahooError {
        if self.is_not_found() {
            return YahooError::SymbolNotFound {
                symbol: symbol.to_string(),
            };
        }
        YahooError::Api {
            code: self.code,
            message: self.description.unwrap_or_default(),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Chart data for one symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    /// Instrument metadata.
    pub meta: ChartMeta,
    /// Bar timestamps (Unix seconds). Absent when the range has no bars.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    /// Price and volume columns.
    #[serde(default)]
    pub indicators: Indicators,
}

/// Instrument metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    /// Symbol as resolved by Yahoo.
    pub symbol: String,
    /// Quote currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    pub gmtoffset: i64,
}

/// Indicator blocks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    /// OHLCV quote columns (a single block for daily bars).
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    /// Dividend and split adjusted close.
    #[serde(default)]
    pub adjclose: Vec<AdjCloseBlock>,
}

/// OHLCV columns; `null` marks a missing value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteBlock {
    /// Open prices.
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    /// High prices.
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    /// Low prices.
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    /// Close prices.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    /// Traded volume.
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// Adjusted close column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdjCloseBlock {
    /// Adjusted close prices.
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartResult {
    /// Convert into a raw frame keyed by exchange-local trading date.
    ///
    /// Only rows whose local date falls in `[start, end)` are kept. Columns
    /// carry two-level labels `(field, symbol)`; column lengths are passed
    /// through untouched so a malformed response fails normalization.
    pub fn into_frame(self, start: NaiveDate, end: NaiveDate) -> Result<RawPriceFrame, YahooError> {
        let offset = self.meta.gmtoffset;
        let mut dates = Vec::with_capacity(self.timestamp.len());
        for ts in &self.timestamp {
            let date = DateTime::from_timestamp(ts.saturating_add(offset), 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| YahooError::JsonParse(format!("timestamp out of range: {ts}")))?;
            dates.push(date);
        }

        let keep: Vec<bool> = dates.iter().map(|d| *d >= start && *d < end).collect();
        let index = select(&dates, &keep);

        let symbol = self.meta.symbol;
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let mut columns = vec![
            ("Open", quote.open),
            ("High", quote.high),
            ("Low", quote.low),
            ("Close", quote.close),
        ];
        if let Some(adj) = self.indicators.adjclose.into_iter().next() {
            columns.push(("Adj Close", adj.adjclose));
        }
        columns.push(("Volume", quote.volume));

        let frame = columns
            .into_iter()
            .fold(RawPriceFrame::new(index), |frame, (field, values)| {
                let values = if values.len() == keep.len() {
                    select(&values, &keep)
                } else {
                    values
                };
                frame.with_column(ColumnLabel::nested([field, symbol.as_str()]), values)
            });

        Ok(frame)
    }
}

fn select<T: Copy>(values: &[T], keep: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(keep)
        .filter_map(|(v, k)| k.then_some(*v))
        .collect()
}
