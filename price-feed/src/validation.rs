use crate::error::ProviderError;
use crate::models::PriceSeries;

/// Accepts a series only if it is non-empty, every price is a finite
/// positive number, and timestamps strictly increase.
pub fn validate_series(series: &PriceSeries) -> Result<(), ProviderError> {
    if series.is_empty() {
        return Err(ProviderError::EmptySeries);
    }

    for (index, point) in series.points().iter().enumerate() {
        if !point.price.is_finite() || point.price <= 0.0 {
            return Err(ProviderError::NonPositivePrice {
                index,
                price: point.price,
            });
        }
    }

    if let Some(index) = series
        .points()
        .windows(2)
        .position(|pair| pair[0].timestamp >= pair[1].timestamp)
    {
        return Err(ProviderError::NotAscending { index: index + 1 });
    }

    Ok(())
}
