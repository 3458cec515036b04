use std::collections::HashMap;
use std::time::Duration;

/// Keys under which the Alpha Vantage credential may appear, in lookup order.
pub const ALPHA_VANTAGE_KEY_ALIASES: [&str; 3] = ["ALPHA_VANTAGE_KEY", "alphavantage", "alpha_vantage"];

/// Upper bound on a single provider attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Caller-supplied settings for building a [`PriceResolver`](crate::PriceResolver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Credential for the secondary provider. `None` means the provider is
    /// left out of the chain.
    pub alpha_vantage_key: Option<String>,
    pub attempt_timeout: Duration,
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_key: None,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Builds a config from key/value settings, picking the credential from
    /// the first alias in [`ALPHA_VANTAGE_KEY_ALIASES`] with a non-blank value.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let alpha_vantage_key = ALPHA_VANTAGE_KEY_ALIASES
            .iter()
            .filter_map(|alias| settings.get(*alias))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string);

        Self {
            alpha_vantage_key,
            ..Self::default()
        }
    }

    pub fn with_alpha_vantage_key(
        mut self,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        self.alpha_vantage_key = if key.trim().is_empty() {
            None
        } else {
            Some(key.trim().to_string())
        };
        self
    }

    pub fn with_attempt_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}
