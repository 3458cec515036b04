//! Shared helpers for the tax calculations.
//!
//! Rounding and clamping live here so every calculation agrees on how a
//! monetary value is brought to two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(2500.004)), dec!(2500.00));
/// assert_eq!(round_half_up(dec!(2500.005)), dec!(2500.01));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value`, or zero when `value` is negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::clamp_non_negative;
///
/// assert_eq!(clamp_non_negative(dec!(-10.00)), dec!(0));
/// assert_eq!(clamp_non_negative(dec!(10.00)), dec!(10.00));
/// ```
pub fn clamp_non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
