//! The fallback chain.
//!
//! Providers are tried in the order they were added. Each attempt is bounded
//! by the resolver's timeout and its output must pass
//! [`validate_series`](crate::validation::validate_series) before it is
//! accepted. The first accepted series wins; if none is accepted the
//! [`SyntheticGenerator`] closes the chain, so [`PriceResolver::resolve`]
//! always returns a series.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{DEFAULT_ATTEMPT_TIMEOUT, ResolverConfig};
use crate::error::ProviderError;
use crate::models::{PriceWindow, ProviderFailure, ProviderResult, Resolution};
use crate::provider::PriceProvider;
use crate::providers::{AlphaVantageProvider, SYNTHETIC_SOURCE, SyntheticGenerator, YahooChartProvider};
use crate::validation::validate_series;

pub struct PriceResolver {
    providers: Vec<Box<dyn PriceProvider>>,
    fallback: SyntheticGenerator,
    attempt_timeout: Duration,
}

impl Default for PriceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPT_TIMEOUT)
    }
}

impl PriceResolver {
    /// An empty chain: every lookup is served by the synthetic generator
    /// until providers are added.
    pub fn new(attempt_timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            fallback: SyntheticGenerator::default(),
            attempt_timeout,
        }
    }

    /// The standard chain: Yahoo, then Alpha Vantage when `config` carries a
    /// credential.
    ///
    /// Fails only when an HTTP client cannot be built from `config`.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, ProviderError> {
        let mut resolver =
            Self::new(config.attempt_timeout).with_provider(YahooChartProvider::new(config)?);

        match &config.alpha_vantage_key {
            Some(key) => {
                resolver = resolver.with_provider(AlphaVantageProvider::new(key.clone(), config)?);
            }
            None => debug!("no Alpha Vantage credential, secondary provider skipped"),
        }

        Ok(resolver)
    }

    /// Appends `provider` to the end of the chain, ahead of the synthetic
    /// fallback.
    pub fn with_provider(
        mut self,
        provider: impl PriceProvider + 'static,
    ) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn with_fallback(
        mut self,
        fallback: SyntheticGenerator,
    ) -> Self {
        self.fallback = fallback;
        self
    }

    /// Names of the real providers, in the order they are tried.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolves a price series for `ticker`. Never fails.
    ///
    /// The ticker is passed to providers as given; upper-casing it is the
    /// caller's job. A blank ticker skips the real providers.
    pub async fn resolve(
        &self,
        ticker: &str,
        window: &PriceWindow,
    ) -> Resolution {
        let mut failures = Vec::new();

        if ticker.trim().is_empty() {
            warn!("blank ticker, using synthetic series");
        } else {
            for provider in &self.providers {
                match self.attempt(provider.as_ref(), ticker, window).await {
                    ProviderResult::Success { provider, series } => {
                        info!(ticker, source = %provider, points = series.len(), "resolved price series");
                        return Resolution {
                            series,
                            source: provider,
                            failures,
                        };
                    }
                    ProviderResult::Failure { provider, reason } => {
                        warn!(ticker, %provider, %reason, "provider failed, falling through");
                        failures.push(ProviderFailure { provider, reason });
                    }
                }
            }
        }

        let series = self.fallback.generate(ticker, window.points());
        info!(ticker, source = SYNTHETIC_SOURCE, points = series.len(), "resolved price series");

        Resolution {
            series,
            source: SYNTHETIC_SOURCE.to_string(),
            failures,
        }
    }

    /// One bounded, validated call to `provider`.
    pub async fn attempt(
        &self,
        provider: &dyn PriceProvider,
        ticker: &str,
        window: &PriceWindow,
    ) -> ProviderResult {
        let name = provider.name().to_string();

        let outcome = match tokio::time::timeout(self.attempt_timeout, provider.fetch(ticker, window)).await {
            Ok(Ok(series)) => validate_series(&series).map(|()| series),
            Ok(Err(reason)) => Err(reason),
            Err(_) => Err(ProviderError::Timeout(self.attempt_timeout)),
        };

        match outcome {
            Ok(series) => ProviderResult::Success {
                provider: name,
                series,
            },
            Err(reason) => ProviderResult::Failure {
                provider: name,
                reason,
            },
        }
    }
}
