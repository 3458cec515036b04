//! Tax calculations.
//!
//! [`slab_tax`] splits a taxable income across a [`SlabSchedule`](crate::SlabSchedule);
//! [`taxable_income`] derives that taxable income from gross income and
//! claimed deductions.

pub mod common;
pub mod slab_tax;
pub mod taxable_income;

pub use slab_tax::{SlabTaxCalculator, compute_tax};
pub use taxable_income::{
    IncomeInputError, TaxableIncomeResult, TaxableIncomeWorksheet, parse_amount, split_codes,
};
