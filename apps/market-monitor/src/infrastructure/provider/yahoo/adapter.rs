//! Yahoo price history adapter implementing PriceHistoryPort.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::application::ports::{MarketDataError, PriceHistoryPort};
use crate::domain::market_data::RawPriceFrame;

use super::config::YahooConfig;
use super::error::YahooError;
use super::http_client::YahooHttpClient;

/// Yahoo Finance price history adapter.
///
/// Implements `PriceHistoryPort` for the v8 chart API with daily bars.
#[derive(Debug, Clone)]
pub struct YahooPriceHistoryAdapter {
    client: YahooHttpClient,
}

impl YahooPriceHistoryAdapter {
    /// Create a new adapter.
    pub fn new(config: &YahooConfig) -> Result<Self, YahooError> {
        Ok(Self {
            client: YahooHttpClient::new(config)?,
        })
    }

    /// Query parameters for a daily chart over `[start, end)`.
    fn chart_query(start: NaiveDate, end: NaiveDate) -> Vec<(&'static str, String)> {
        vec![
            ("period1", midnight_utc(start).to_string()),
            ("period2", midnight_utc(end).to_string()),
            ("interval", "1d".to_string()),
            ("includeAdjustedClose", "true".to_string()),
        ]
    }

    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceFrame, YahooError> {
        let response = self
            .client
            .get_chart(ticker, &Self::chart_query(start, end))
            .await?;

        if let Some(error) = response.chart.error {
            return Err(error.into_error(ticker));
        }

        let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(RawPriceFrame::default());
        };

        tracing::debug!(
            ticker,
            symbol = %result.meta.symbol,
            bars = result.timestamp.len(),
            currency = result.meta.currency.as_deref().unwrap_or("unknown"),
            "Received chart"
        );

        result.into_frame(start, end)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[async_trait]
impl PriceHistoryPort for YahooPriceHistoryAdapter {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceFrame, MarketDataError> {
        Ok(self.fetch(ticker, start, end).await?)
    }
}
