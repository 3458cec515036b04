//! Property tests for the slab calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::{SlabSchedule, SlabTaxCalculator, TaxSlab, compute_tax};

/// Incomes up to 5 crore, in paise.
fn income() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

/// Small incomes in tenths of a paisa, where rounding residuals dominate.
fn small_income() -> impl Strategy<Value = Decimal> {
    (0i64..10_000).prop_map(|mills| Decimal::new(mills, 3))
}

/// Schedules whose per-slab rounding overshoots the rounded total.
fn awkward_schedules() -> Vec<SlabSchedule> {
    vec![
        SlabSchedule::new(vec![
            TaxSlab::bounded(dec!(1), dec!(0.005)),
            TaxSlab::bounded(dec!(2), dec!(0.005)),
            TaxSlab::unbounded(dec!(0)),
        ])
        .unwrap(),
        SlabSchedule::new(vec![
            TaxSlab::bounded(dec!(1), dec!(0.005)),
            TaxSlab::bounded(dec!(2), dec!(0.005)),
            TaxSlab::bounded(dec!(3), dec!(0.005)),
            TaxSlab::unbounded(dec!(0)),
        ])
        .unwrap(),
        SlabSchedule::new(vec![
            TaxSlab::bounded(dec!(1000.33), dec!(0.0333)),
            TaxSlab::bounded(dec!(50000.77), dec!(0.1177)),
            TaxSlab::bounded(dec!(999999.99), dec!(0.2345)),
            TaxSlab::unbounded(dec!(0.3131)),
        ])
        .unwrap(),
    ]
}

proptest! {
    #[test]
    fn total_tax_is_never_negative(x in income()) {
        prop_assert!(compute_tax(x).total_tax >= Decimal::ZERO);
    }

    #[test]
    fn total_tax_is_monotonic(a in income(), b in income()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(compute_tax(low).total_tax <= compute_tax(high).total_tax);
    }

    #[test]
    fn breakdown_sums_to_total(x in income()) {
        let result = compute_tax(x);
        prop_assert_eq!(result.breakdown_total(), result.total_tax);
    }

    #[test]
    fn breakdown_allocates_the_whole_income(x in income()) {
        let allocated: Decimal = compute_tax(x)
            .breakdown
            .iter()
            .map(|entry| entry.taxable_amount)
            .sum();
        prop_assert_eq!(allocated, x);
    }

    #[test]
    fn breakdown_entries_are_non_negative(x in income()) {
        for entry in compute_tax(x).breakdown {
            prop_assert!(entry.taxable_amount >= Decimal::ZERO);
            prop_assert!(entry.tax_owed >= Decimal::ZERO);
        }
    }

    #[test]
    fn fine_grained_schedule_stays_within_a_cent(x in income()) {
        // Rates with many decimal places make per-slab rounding diverge from
        // the rounded total; reconciliation must still close the gap.
        let schedule = SlabSchedule::new(vec![
            TaxSlab::bounded(dec!(1000.33), dec!(0.0333)),
            TaxSlab::bounded(dec!(50000.77), dec!(0.1177)),
            TaxSlab::bounded(dec!(999999.99), dec!(0.2345)),
            TaxSlab::unbounded(dec!(0.3131)),
        ])
        .unwrap();

        let result = SlabTaxCalculator::new(&schedule).calculate(x);

        prop_assert_eq!(result.breakdown_total(), result.total_tax);
    }

    #[test]
    fn awkward_schedules_never_owe_a_negative_entry(x in small_income()) {
        for schedule in awkward_schedules() {
            let result = SlabTaxCalculator::new(&schedule).calculate(x);

            prop_assert_eq!(result.breakdown_total(), result.total_tax);
            for entry in &result.breakdown {
                prop_assert!(
                    entry.tax_owed >= Decimal::ZERO,
                    "{} owes {} on income {}",
                    entry.range_label,
                    entry.tax_owed,
                    x
                );
            }
        }
    }
}

#[test]
fn reference_incomes_match_published_figures() {
    let cases = [
        (dec!(0), dec!(0.00)),
        (dec!(250000), dec!(0.00)),
        (dec!(300000), dec!(2500.00)),
        (dec!(500000), dec!(12500.00)),
        (dec!(600000), dec!(32500.00)),
        (dec!(1000000), dec!(112500.00)),
        (dec!(1200000), dec!(172500.00)),
    ];

    for (income, expected) in cases {
        assert_eq!(
            compute_tax(income).total_tax,
            expected,
            "tax on {income} should be {expected}"
        );
    }
}
