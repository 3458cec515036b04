use std::time::Duration;

use thiserror::Error;

/// Why a provider could not be built or an attempt did not produce a usable
/// series.
///
/// Attempt failures never reach callers of
/// [`PriceResolver::resolve`](crate::PriceResolver::resolve); they are kept on
/// the [`Resolution`](crate::Resolution) as an audit trail.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// The HTTP client itself could not be set up, e.g. an invalid user agent.
    #[error("cannot build HTTP client: {0}")]
    Client(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The response lacked the field the provider promises, typically
    /// because a quota was hit or the symbol is unknown.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("provider returned an empty series")]
    EmptySeries,

    #[error("malformed series: {0}")]
    Malformed(String),

    #[error("price {price} at index {index} is not positive")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("timestamp at index {index} does not follow its predecessor")]
    NotAscending { index: usize },
}

impl ProviderError {
    /// Classifies a `reqwest` failure. `timeout` is the bound the client was
    /// built with.
    pub fn from_reqwest(
        err: reqwest::Error,
        timeout: Duration,
    ) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Network(err.to_string())
        }
    }
}
