//! Fallback-chain behaviour with scripted providers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;

use price_feed::{
    PricePoint, PriceProvider, PriceResolver, PriceSeries, PriceWindow, ProviderError, ResolverConfig,
    SYNTHETIC_SOURCE,
};

// =============================================================================
// Scripted provider
// =============================================================================

#[derive(Clone)]
enum Script {
    Series(PriceSeries),
    Fail(ProviderError),
    Hang,
}

struct ScriptedProvider {
    name: &'static str,
    script: Script,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new(
        name: &'static str,
        script: Script,
    ) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                script,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl PriceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(
        &self,
        _ticker: &str,
        _window: &PriceWindow,
    ) -> Result<PriceSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Series(series) => Ok(series.clone()),
            Script::Fail(reason) => Err(reason.clone()),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(good_series())
            }
        }
    }
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, d, 0, 0, 0).unwrap()
}

fn series(points: &[(u32, f64)]) -> PriceSeries {
    PriceSeries::new(
        points
            .iter()
            .map(|&(d, price)| PricePoint {
                timestamp: day(d),
                price,
            })
            .collect(),
    )
}

fn good_series() -> PriceSeries {
    series(&[(1, 100.0), (2, 101.5), (3, 99.25)])
}

fn resolver() -> PriceResolver {
    PriceResolver::new(Duration::from_millis(200))
}

// =============================================================================
// Chain ordering
// =============================================================================

#[tokio::test]
async fn primary_success_short_circuits_the_chain() {
    let (primary, primary_calls) = ScriptedProvider::new("primary", Script::Series(good_series()));
    let (secondary, secondary_calls) = ScriptedProvider::new("secondary", Script::Series(good_series()));
    let resolver = resolver().with_provider(primary).with_provider(secondary);

    let resolution = resolver.resolve("ACME", &PriceWindow::default()).await;

    assert_eq!(resolution.source, "primary");
    assert_eq!(resolution.series, good_series());
    assert!(resolution.failures.is_empty());
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn secondary_serves_when_primary_fails() {
    let (primary, _) = ScriptedProvider::new("primary", Script::Fail(ProviderError::Status(404)));
    let (secondary, secondary_calls) = ScriptedProvider::new("secondary", Script::Series(good_series()));
    let resolver = resolver().with_provider(primary).with_provider(secondary);

    let resolution = resolver.resolve("ACME", &PriceWindow::default()).await;

    assert_eq!(resolution.source, "secondary");
    assert!(!resolution.is_synthetic());
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(resolution.failures.len(), 1);
    assert_eq!(resolution.failures[0].provider, "primary");
    assert_eq!(resolution.failures[0].reason, ProviderError::Status(404));
}

#[tokio::test]
async fn primary_failure_without_secondary_is_synthetic() {
    let (primary, primary_calls) =
        ScriptedProvider::new("primary", Script::Fail(ProviderError::Network("refused".to_string())));
    let resolver = resolver().with_provider(primary);
    let window = PriceWindow::default();

    let resolution = resolver.resolve("ACME", &window).await;

    assert_eq!(resolution.source, SYNTHETIC_SOURCE);
    assert!(resolution.is_synthetic());
    assert_eq!(resolution.series.len(), window.points());
    assert!(resolution.series.prices().iter().all(|p| *p > 0.0));
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn every_provider_failing_records_each_failure_in_order() {
    let (a, _) = ScriptedProvider::new("a", Script::Fail(ProviderError::Status(500)));
    let (b, _) = ScriptedProvider::new(
        "b",
        Script::Fail(ProviderError::UnexpectedPayload("quota".to_string())),
    );
    let resolver = resolver().with_provider(a).with_provider(b);

    let resolution = resolver.resolve("ACME", &PriceWindow::default()).await;

    let names: Vec<&str> = resolution.failures.iter().map(|f| f.provider.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(resolution.is_synthetic());
}

#[tokio::test]
async fn empty_chain_goes_straight_to_synthetic() {
    let resolution = resolver().resolve("ACME", &PriceWindow::default()).await;

    assert!(resolution.is_synthetic());
    assert!(resolution.failures.is_empty());
    assert_eq!(resolution.series.len(), 30);
}

#[tokio::test]
async fn blank_ticker_never_reaches_providers() {
    let (primary, primary_calls) = ScriptedProvider::new("primary", Script::Series(good_series()));
    let resolver = resolver().with_provider(primary);

    let resolution = resolver.resolve("  ", &PriceWindow::default()).await;

    assert!(resolution.is_synthetic());
    assert!(!resolution.series.is_empty());
    assert_eq!(primary_calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn empty_series_falls_through() {
    let (primary, _) = ScriptedProvider::new("primary", Script::Series(PriceSeries::default()));
    let (secondary, _) = ScriptedProvider::new("secondary", Script::Series(good_series()));
    let resolver = resolver().with_provider(primary).with_provider(secondary);

    let resolution = resolver.resolve("ACME", &PriceWindow::default()).await;

    assert_eq!(resolution.source, "secondary");
    assert_eq!(resolution.failures[0].reason, ProviderError::EmptySeries);
}

#[tokio::test]
async fn non_positive_price_falls_through() {
    let (primary, _) = ScriptedProvider::new("primary", Script::Series(series(&[(1, 10.0), (2, 0.0)])));
    let resolver = resolver().with_provider(primary);

    let resolution = resolver.resolve("ACME", &PriceWindow::default()).await;

    assert!(resolution.is_synthetic());
    assert_eq!(
        resolution.failures[0].reason,
        ProviderError::NonPositivePrice { index: 1, price: 0.0 }
    );
}

#[tokio::test]
async fn descending_series_falls_through() {
    let (primary, _) = ScriptedProvider::new(
        "primary",
        Script::Series(series(&[(3, 10.0), (2, 11.0), (4, 12.0)])),
    );
    let resolver = resolver().with_provider(primary);

    let resolution = resolver.resolve("ACME", &PriceWindow::default()).await;

    assert!(resolution.is_synthetic());
    assert_eq!(
        resolution.failures[0].reason,
        ProviderError::NotAscending { index: 1 }
    );
}

// =============================================================================
// Timeouts
// =============================================================================

#[tokio::test]
async fn slow_provider_times_out_and_chain_continues() {
    let (slow, _) = ScriptedProvider::new("slow", Script::Hang);
    let (fast, fast_calls) = ScriptedProvider::new("fast", Script::Series(good_series()));
    let timeout = Duration::from_millis(50);
    let resolver = PriceResolver::new(timeout).with_provider(slow).with_provider(fast);

    let resolution = resolver.resolve("ACME", &PriceWindow::default()).await;

    assert_eq!(resolution.source, "fast");
    assert_eq!(resolution.failures[0].reason, ProviderError::Timeout(timeout));
    assert_eq!(fast_calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Ordering guarantee
// =============================================================================

#[tokio::test]
async fn every_path_returns_ascending_timestamps() {
    let window = PriceWindow::default();

    let (real, _) = ScriptedProvider::new("real", Script::Series(good_series()));
    let served = resolver().with_provider(real).resolve("ACME", &window).await;
    assert!(served.series.is_strictly_ascending());

    let (broken, _) = ScriptedProvider::new("broken", Script::Fail(ProviderError::EmptySeries));
    let fallback = resolver().with_provider(broken).resolve("ACME", &window).await;
    assert!(fallback.is_synthetic());
    assert!(fallback.series.is_strictly_ascending());
}

// =============================================================================
// Standard chain
// =============================================================================

#[test]
fn standard_chain_without_credential_has_only_yahoo() {
    let resolver = PriceResolver::from_config(&ResolverConfig::default()).unwrap();

    assert_eq!(resolver.provider_names(), vec!["yahoo"]);
}

#[test]
fn standard_chain_with_credential_adds_alpha_vantage() {
    let config = ResolverConfig::default().with_alpha_vantage_key("demo");

    let resolver = PriceResolver::from_config(&config).unwrap();

    assert_eq!(resolver.provider_names(), vec!["yahoo", "alpha_vantage"]);
}

#[test]
fn standard_chain_reports_unbuildable_client() {
    let config = ResolverConfig {
        user_agent: "line\rbreak".to_string(),
        ..ResolverConfig::default()
    };

    let result = PriceResolver::from_config(&config);

    assert!(matches!(result, Err(ProviderError::Client(_))));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_resolves_share_one_resolver() {
    let (primary, primary_calls) = ScriptedProvider::new("primary", Script::Series(good_series()));
    let resolver = Arc::new(resolver().with_provider(primary));

    let handles: Vec<_> = ["AAA", "BBB", "CCC", "DDD"]
        .into_iter()
        .map(|ticker| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.resolve(ticker, &PriceWindow::default()).await })
        })
        .collect();

    for handle in handles {
        let resolution = handle.await.unwrap();
        assert_eq!(resolution.source, "primary");
    }
    assert_eq!(primary_calls.load(Ordering::SeqCst), 4);
}
