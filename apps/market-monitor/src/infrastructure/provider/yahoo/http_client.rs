//! HTTP client wrapper with retry logic.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::api_types::ChartResponse;
use super::config::{RetryConfig, YahooConfig};
use super::error::YahooError;

/// HTTP client for the Yahoo Finance API with retry logic.
#[derive(Debug, Clone)]
pub struct YahooHttpClient {
    client: Client,
    base_url: Url,
    retry_config: RetryConfig,
}

/// Outcome of a non-success response once retries are exhausted or skipped.
#[derive(Debug)]
pub struct ErrorResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Raw response body.
    pub body: String,
}

impl YahooHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &YahooConfig) -> Result<Self, YahooError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| YahooError::Http(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(YahooError::Http(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| YahooError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            retry_config: config.retry.clone(),
        })
    }

    /// Build the request URL from path segments and query pairs.
    ///
    /// Segments are percent-encoded individually, so a symbol can never
    /// escape its path segment.
    pub fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, YahooError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| YahooError::Http("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// GET the chart for `symbol`.
    ///
    /// A 404, or a chart error body, becomes [`YahooError::SymbolNotFound`].
    pub async fn get_chart(
        &self,
        symbol: &str,
        query: &[(&str, String)],
    ) -> Result<ChartResponse, YahooError> {
        let url = self.url(&["v8", "finance", "chart", symbol], query)?;
        match self.get(url).await? {
            Ok(chart) => Ok(chart),
            Err(ErrorResponse { status, body }) => {
                let chart_error = serde_json::from_str::<ChartResponse>(&body)
                    .ok()
                    .and_then(|r| r.chart.error);
                match (status, chart_error) {
                    (StatusCode::NOT_FOUND, _) => Err(YahooError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }),
                    (_, Some(error)) => Err(error.into_error(symbol)),
                    (status, None) => Err(YahooError::Api {
                        code: status.as_u16().to_string(),
                        message: body,
                    }),
                }
            }
        }
    }

    /// GET `url`, retrying network errors, 408/5xx and 429.
    ///
    /// Returns the decoded body on success and the final non-retryable
    /// response otherwise.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Result<T, ErrorResponse>, YahooError> {
        let mut backoff = ExponentialBackoff::new(&self.retry_config);

        loop {
            let response = match self.client.get(url.clone()).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    tracing::error!(error = %e, attempts = backoff.attempt, "Giving up on request");
                    return Err(YahooError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                    });
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| YahooError::Network(e.to_string()))?;
                return serde_json::from_str(&text)
                    .map(Ok)
                    .map_err(|e| YahooError::JsonParse(e.to_string()));
            }

            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());

            let body = response.text().await.unwrap_or_default();

            match categorize_status(status) {
                ErrorCategory::RateLimited => {
                    if let Some(delay) = backoff.next_backoff() {
                        let delay = retry_after.map_or(delay, Duration::from_secs);
                        tracing::warn!(
                            status = status.as_u16(),
                            delay_ms = delay.as_millis(),
                            "Rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(YahooError::RateLimited {
                        retry_after_secs: retry_after.unwrap_or(60),
                    });
                }
                ErrorCategory::Retryable => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            status = status.as_u16(),
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Retryable error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(YahooError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                    });
                }
                ErrorCategory::NonRetryable => {
                    return Ok(Err(ErrorResponse { status, body }));
                }
            }
        }
    }
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    /// Delay before the next attempt, or `None` once attempts are spent.
    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}
