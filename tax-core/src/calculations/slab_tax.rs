//! Progressive slab tax.
//!
//! Income is walked through the slabs of a [`SlabSchedule`] in ascending
//! order. Each slab taxes only the portion of income that falls inside it,
//! and the walk stops as soon as the whole income has been allocated.
//!
//! # Default Schedule
//!
//! | Slab | Range                 | Rate |
//! |------|-----------------------|------|
//! | 1    | 0 – 2,50,000          | 0%   |
//! | 2    | 2,50,001 – 5,00,000   | 5%   |
//! | 3    | 5,00,001 – 10,00,000  | 20%  |
//! | 4    | above 10,00,000       | 30%  |
//!
//! # Rounding
//!
//! The total is rounded half-up to two places once, at the end. Each
//! breakdown entry is rounded the same way and the residual is settled on
//! the largest entries, so the breakdown always sums to the total exactly
//! and no entry drops below zero.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::compute_tax;
//!
//! let result = compute_tax(dec!(600000));
//!
//! assert_eq!(result.total_tax, dec!(32500.00));
//! assert_eq!(result.breakdown.len(), 3);
//! assert_eq!(result.breakdown[2].range_label, "500001-1000000");
//! assert_eq!(result.breakdown[2].tax_owed, dec!(20000.00));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{clamp_non_negative, round_half_up};
use crate::{SlabSchedule, SlabTaxResult, TaxBreakdownEntry};

/// Computes tax against the default [`SlabSchedule`].
///
/// `taxable_income` must be non-negative; validating that is the caller's
/// job (see [`parse_amount`](crate::calculations::parse_amount)). A negative
/// value is treated as zero income.
pub fn compute_tax(taxable_income: Decimal) -> SlabTaxResult {
    SlabTaxCalculator::new(&SlabSchedule::default()).calculate(taxable_income)
}

/// Calculator bound to a particular slab schedule.
#[derive(Debug, Clone, Copy)]
pub struct SlabTaxCalculator<'a> {
    schedule: &'a SlabSchedule,
}

impl<'a> SlabTaxCalculator<'a> {
    pub fn new(schedule: &'a SlabSchedule) -> Self {
        Self { schedule }
    }

    /// Splits `taxable_income` across the schedule and returns the rounded
    /// total with its itemised breakdown.
    ///
    /// The breakdown always contains at least the first slab, even for zero
    /// income. Slabs above the income are omitted.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> SlabTaxResult {
        let mut breakdown = Vec::with_capacity(self.schedule.len());
        let mut previous_bound = Decimal::ZERO;
        let mut remaining = taxable_income;
        let mut unrounded_total = Decimal::ZERO;

        for slab in self.schedule.slabs() {
            let portion = match slab.upper_bound {
                Some(upper) => remaining.min(upper - previous_bound),
                None => remaining,
            };
            let portion = clamp_non_negative(portion);
            let tax = portion * slab.rate;
            unrounded_total += tax;

            breakdown.push(TaxBreakdownEntry {
                range_label: range_label(previous_bound, slab.upper_bound),
                taxable_amount: portion,
                rate: slab.rate,
                tax_owed: tax,
            });

            let Some(upper) = slab.upper_bound else {
                break;
            };
            previous_bound = upper;
            remaining = taxable_income - previous_bound;
            if remaining <= Decimal::ZERO {
                break;
            }
        }

        let total_tax = round_half_up(unrounded_total);
        reconcile(&mut breakdown, total_tax);

        debug!(
            %taxable_income,
            %total_tax,
            slabs_touched = breakdown.len(),
            "computed slab tax"
        );

        SlabTaxResult {
            total_tax,
            breakdown,
        }
    }
}

/// Rounds every entry and settles the residual on the largest entries so
/// the entries sum to `total_tax` without any of them going negative.
///
/// Ties go to the later slab.
fn reconcile(
    breakdown: &mut [TaxBreakdownEntry],
    total_tax: Decimal,
) {
    for entry in breakdown.iter_mut() {
        entry.tax_owed = round_half_up(entry.tax_owed);
    }

    let rounded_sum: Decimal = breakdown.iter().map(|entry| entry.tax_owed).sum();
    let mut residual = total_tax - rounded_sum;

    while !residual.is_zero() {
        let Some(largest) = breakdown.iter_mut().max_by_key(|entry| entry.tax_owed) else {
            return;
        };
        let adjustment = if residual.is_sign_positive() {
            residual
        } else {
            residual.max(-largest.tax_owed)
        };
        if adjustment.is_zero() {
            return;
        }
        largest.tax_owed += adjustment;
        residual -= adjustment;
    }
}

fn range_label(
    lower: Decimal,
    upper: Option<Decimal>,
) -> String {
    let start = lower.trunc() + Decimal::ONE;
    match upper {
        Some(upper) => format!("{}-{}", start, upper.trunc()),
        None => format!("{start}-inf"),
    }
}
