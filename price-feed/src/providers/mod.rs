//! Concrete price sources.
//!
//! [`yahoo`] is tried first, [`alpha_vantage`] second when a credential is
//! configured, and [`synthetic`] closes the chain and cannot fail.

pub mod alpha_vantage;
pub mod synthetic;
pub mod yahoo;

use reqwest::Client;

use crate::config::ResolverConfig;
use crate::error::ProviderError;

pub use alpha_vantage::AlphaVantageProvider;
pub use synthetic::{SYNTHETIC_SOURCE, SyntheticGenerator};
pub use yahoo::YahooChartProvider;

/// HTTP client shared by the network providers, bounded by the attempt
/// timeout.
fn http_client(config: &ResolverConfig) -> Result<Client, ProviderError> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.attempt_timeout)
        .build()
        .map_err(|e| ProviderError::Client(e.to_string()))
}
