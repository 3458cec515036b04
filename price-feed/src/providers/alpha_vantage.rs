//! Secondary provider: Alpha Vantage daily time series.
//!
//! Only part of the chain when the caller configured a credential. The
//! endpoint answers quota exhaustion and unknown symbols with HTTP 200 and a
//! `Note`/`Information`/`Error Message` body instead of the series, so the
//! absence of the series field is what signals failure.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::http_client;
use crate::config::ResolverConfig;
use crate::error::ProviderError;
use crate::models::{PricePoint, PriceSeries, PriceWindow};
use crate::provider::PriceProvider;

const QUERY_URL: &str = "https://www.alphavantage.co/query";
const SERIES_FIELD: &str = "Time Series (Daily)";
const ADJUSTED_CLOSE_FIELD: &str = "5. adjusted close";
const CLOSE_FIELD: &str = "4. close";
const NOTICE_FIELDS: [&str; 3] = ["Note", "Information", "Error Message"];

pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl AlphaVantageProvider {
    pub fn new(
        api_key: impl Into<String>,
        config: &ResolverConfig,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(config)?,
            api_key: api_key.into(),
            base_url: QUERY_URL.to_string(),
            timeout: config.attempt_timeout,
        })
    }

    pub fn with_base_url(
        mut self,
        base_url: impl Into<String>,
    ) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    async fn fetch(
        &self,
        ticker: &str,
        window: &PriceWindow,
    ) -> Result<PriceSeries, ProviderError> {
        debug!(ticker, points = window.points(), "requesting daily series");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY_ADJUSTED"),
                ("symbol", ticker),
                ("outputsize", "compact"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout))?;

        parse_daily_series(&json, window.points())
    }
}

/// Takes the `points` most recent closes, oldest first.
///
/// Prefers the adjusted close and falls back to the raw close when the
/// response comes from the non-adjusted endpoint.
pub fn parse_daily_series(
    json: &Value,
    points: usize,
) -> Result<PriceSeries, ProviderError> {
    let Some(series) = json.get(SERIES_FIELD).and_then(Value::as_object) else {
        let notice = NOTICE_FIELDS
            .iter()
            .find_map(|field| json.get(*field).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("missing '{SERIES_FIELD}'"));
        return Err(ProviderError::UnexpectedPayload(notice));
    };

    // ISO dates sort chronologically as strings.
    let mut dates: Vec<&String> = series.keys().collect();
    dates.sort_unstable();
    let recent = &dates[dates.len().saturating_sub(points)..];

    let mut out = Vec::with_capacity(recent.len());
    for date in recent {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| ProviderError::Malformed(format!("bad date '{date}': {e}")))?;
        let timestamp = day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ProviderError::Malformed(format!("bad date '{date}'")))?
            .and_utc();

        let fields = &series[date.as_str()];
        let raw = fields
            .get(ADJUSTED_CLOSE_FIELD)
            .or_else(|| fields.get(CLOSE_FIELD))
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::Malformed(format!("no close for {date}")))?;
        let price = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| ProviderError::Malformed(format!("bad close '{raw}' for {date}: {e}")))?;

        out.push(PricePoint { timestamp, price });
    }

    Ok(PriceSeries::new(out))
}
