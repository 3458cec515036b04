//! Last-resort series generator.
//!
//! A bounded random walk: a base price drawn once, then each day moves by at
//! most 3% in either direction, floored at 1.0. Output is always exactly the
//! requested number of points (capped at [`MAX_POINTS`]), positive, and
//! strictly ascending in time, so it satisfies the same checks as real
//! provider data.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{MAX_POINTS, PricePoint, PriceSeries};

/// Source label attached to generated series.
pub const SYNTHETIC_SOURCE: &str = "simulated";

const MAX_DAILY_MOVE: f64 = 0.03;
const PRICE_FLOOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticGenerator {
    seed: Option<u64>,
}

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the seed for every ticker. Without one, each ticker gets its own
    /// stable seed so repeated lookups of the same symbol look the same.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn generate(
        &self,
        ticker: &str,
        points: usize,
    ) -> PriceSeries {
        self.generate_at(ticker, points, Utc::now())
    }

    /// Generates `points` daily prices ending one day before `now`.
    ///
    /// A `now` too close to the start of the calendar is pushed forward far
    /// enough for the whole series to fit.
    pub fn generate_at(
        &self,
        ticker: &str,
        points: usize,
        now: DateTime<Utc>,
    ) -> PriceSeries {
        let points = points.clamp(1, MAX_POINTS);
        let end = DateTime::<Utc>::MIN_UTC
            .checked_add_signed(Duration::days(points as i64 + 1))
            .map_or(now, |earliest| now.max(earliest));
        let seed = self.seed.unwrap_or_else(|| ticker_seed(ticker));
        let mut rng = StdRng::seed_from_u64(seed);

        let mut price: f64 = rng.gen_range(50.0..500.0);
        let mut out = Vec::with_capacity(points);
        for i in 0..points {
            let change: f64 = rng.gen_range(-MAX_DAILY_MOVE..=MAX_DAILY_MOVE);
            price = (price * (1.0 + change)).max(PRICE_FLOOR);
            out.push(PricePoint {
                timestamp: end - Duration::days((points - i) as i64),
                price: round_cents(price),
            });
        }

        PriceSeries::new(out)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// FNV-1a; stable across runs and platforms, unlike the std hasher.
fn ticker_seed(ticker: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    ticker
        .trim()
        .to_uppercase()
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}
