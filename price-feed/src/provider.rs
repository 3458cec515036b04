use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{PriceSeries, PriceWindow};

/// One source of recent prices for a ticker.
///
/// Implementations make a single attempt per call; retrying is their own
/// business and the resolver never retries on their behalf. Series must be
/// returned in ascending timestamp order.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Stable identifier reported as the resolution source.
    fn name(&self) -> &str;

    async fn fetch(
        &self,
        ticker: &str,
        window: &PriceWindow,
    ) -> Result<PriceSeries, ProviderError>;
}
