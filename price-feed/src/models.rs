use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Points requested when the caller does not say otherwise.
pub const DEFAULT_POINTS: usize = 30;

/// Upper bound on points per window; roughly 27 years of daily prices.
pub const MAX_POINTS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Price points in the order a provider delivered them.
///
/// Providers must deliver ascending timestamps; the resolver checks this
/// but never re-sorts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Zips parallel timestamp and price columns.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Malformed`] when the columns differ in length.
    pub fn from_columns(
        timestamps: Vec<DateTime<Utc>>,
        prices: Vec<f64>,
    ) -> Result<Self, ProviderError> {
        if timestamps.len() != prices.len() {
            return Err(ProviderError::Malformed(format!(
                "{} timestamps but {} prices",
                timestamps.len(),
                prices.len()
            )));
        }

        Ok(Self {
            points: timestamps
                .into_iter()
                .zip(prices)
                .map(|(timestamp, price)| PricePoint { timestamp, price })
                .collect(),
        })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn is_strictly_ascending(&self) -> bool {
        self.points
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp)
    }
}

/// How far back a series should reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    FiveDays,
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Period {
    /// Range code understood by the Yahoo chart endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5d" | "5 days" => Ok(Self::FiveDays),
            "1mo" | "1 month" => Ok(Self::OneMonth),
            "3mo" | "3 months" => Ok(Self::ThreeMonths),
            "6mo" | "6 months" => Ok(Self::SixMonths),
            "1y" | "1 year" => Ok(Self::OneYear),
            other => Err(format!("unknown period '{other}'")),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spacing between consecutive points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "daily" => Ok(Self::Daily),
            "1wk" | "weekly" => Ok(Self::Weekly),
            other => Err(format!("unknown interval '{other}'")),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller wants: a period, a sampling interval, and the number of
/// most-recent points to cap bounded providers (and size synthetic output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceWindow {
    pub period: Period,
    pub interval: Interval,
    points: usize,
}

impl PriceWindow {
    /// `points` is clamped to `1..=MAX_POINTS`.
    pub fn new(
        period: Period,
        interval: Interval,
        points: usize,
    ) -> Self {
        Self {
            period,
            interval,
            points: points.clamp(1, MAX_POINTS),
        }
    }

    pub fn points(&self) -> usize {
        self.points
    }
}

impl Default for PriceWindow {
    fn default() -> Self {
        Self::new(Period::default(), Interval::default(), DEFAULT_POINTS)
    }
}

/// Outcome of asking one provider for a series.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    Success {
        provider: String,
        series: PriceSeries,
    },
    Failure {
        provider: String,
        reason: ProviderError,
    },
}

/// A provider that was tried and rejected during a resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: ProviderError,
}

/// What [`PriceResolver::resolve`](crate::PriceResolver::resolve) hands back:
/// a non-empty series, the provider that served it, and every failure on
/// the way there.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub series: PriceSeries,
    pub source: String,
    pub failures: Vec<ProviderFailure>,
}

impl Resolution {
    pub fn is_synthetic(&self) -> bool {
        self.source == crate::providers::synthetic::SYNTHETIC_SOURCE
    }
}
