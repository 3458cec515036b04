//! Recent price series for a ticker, with a guaranteed answer.
//!
//! [`PriceResolver`] walks an ordered chain of [`PriceProvider`]s and falls
//! back to a synthetic series when every real source fails, so callers never
//! have to handle a lookup error.

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod validation;

pub use config::ResolverConfig;
pub use error::ProviderError;
pub use models::*;
pub use provider::PriceProvider;
pub use providers::{AlphaVantageProvider, SYNTHETIC_SOURCE, SyntheticGenerator, YahooChartProvider};
pub use resolver::PriceResolver;
pub use validation::validate_series;
