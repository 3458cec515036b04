//! Primary provider: the Yahoo Finance v8 chart endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::http_client;
use crate::config::ResolverConfig;
use crate::error::ProviderError;
use crate::models::{PricePoint, PriceSeries, PriceWindow};
use crate::provider::PriceProvider;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Escapes everything in a symbol except RFC 3986 unreserved characters, so
/// `^NSEI` or `BRK/B` stay a single path segment.
const SYMBOL_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl YahooChartProvider {
    pub fn new(config: &ResolverConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(config)?,
            base_url: CHART_URL.to_string(),
            timeout: config.attempt_timeout,
        })
    }

    /// Points the provider at a different chart endpoint.
    pub fn with_base_url(
        mut self,
        base_url: impl Into<String>,
    ) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PriceProvider for YahooChartProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch(
        &self,
        ticker: &str,
        window: &PriceWindow,
    ) -> Result<PriceSeries, ProviderError> {
        let url = chart_url(&self.base_url, ticker);
        debug!(%url, range = %window.period, interval = %window.interval, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", window.period.as_str()),
                ("interval", window.interval.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        let body = response.text().await;
        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), body.as_deref().unwrap_or_default()));
        }

        let body = body.map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::UnexpectedPayload(format!("invalid JSON: {e}")))?;
        if let Some(description) = chart_error(&json) {
            return Err(ProviderError::UnexpectedPayload(description));
        }

        parse_chart(&json)
    }
}

fn chart_url(
    base_url: &str,
    ticker: &str,
) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(ticker, SYMBOL_ESCAPES)
    )
}

/// Maps a non-success response. Unknown symbols come back as 404 with a
/// `chart.error` description; anything else (gateway pages, empty bodies)
/// keeps its status code.
fn classify_failure(
    status: u16,
    body: &str,
) -> ProviderError {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| chart_error(&json))
        .map_or(ProviderError::Status(status), ProviderError::UnexpectedPayload)
}

fn chart_error(json: &Value) -> Option<String> {
    let error = json.get("chart")?.get("error")?;
    if error.is_null() {
        return None;
    }
    Some(
        error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("chart error")
            .to_string(),
    )
}

/// Extracts closing prices from a chart response.
///
/// Days with a null close (halts, partial sessions) are dropped.
pub fn parse_chart(json: &Value) -> Result<PriceSeries, ProviderError> {
    let chart = json
        .get("chart")
        .and_then(|v| v.get("result"))
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .ok_or_else(|| ProviderError::UnexpectedPayload("no chart result".to_string()))?;

    // A valid symbol with no trades in range has no timestamp array at all.
    let Some(timestamps) = chart.get("timestamp").and_then(Value::as_array) else {
        return Err(ProviderError::EmptySeries);
    };

    let closes = chart
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|quote| quote.get("close"))
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::UnexpectedPayload("no close prices".to_string()))?;

    if timestamps.len() != closes.len() {
        return Err(ProviderError::Malformed(format!(
            "{} timestamps but {} closes",
            timestamps.len(),
            closes.len()
        )));
    }

    let mut points = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.iter().zip(closes) {
        let Some(price) = close.as_f64() else {
            continue;
        };
        let secs = ts
            .as_i64()
            .ok_or_else(|| ProviderError::Malformed(format!("bad timestamp {ts}")))?;
        let timestamp = DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| ProviderError::Malformed(format!("timestamp {secs} out of range")))?;
        points.push(PricePoint { timestamp, price });
    }

    Ok(PriceSeries::new(points))
}
