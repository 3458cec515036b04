//! Taxable income from gross income and claimed deductions.
//!
//! A user claims deductions by code (looked up in a [`DeductionTable`]) and
//! may add a free-form extra amount. The result is floored at zero and is
//! what gets handed to the slab calculator.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{DeductionTable, TaxableIncomeWorksheet};
//!
//! let table = DeductionTable::seeded();
//! let worksheet = TaxableIncomeWorksheet::new(&table);
//!
//! let result = worksheet.calculate(dec!(900000), &["hra", "MED", "XYZ"], dec!(5000));
//!
//! assert_eq!(result.total_deductions, dec!(180000));
//! assert_eq!(result.taxable_income, dec!(720000));
//! assert_eq!(result.unknown_codes, vec!["XYZ".to_string()]);
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::clamp_non_negative;
use crate::models::normalize_code;
use crate::{Deduction, DeductionTable};

/// Rejections raised while validating a user-entered amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncomeInputError {
    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    #[error("amount must not be negative, got {0}")]
    Negative(Decimal),
}

/// Parses a user-entered amount.
///
/// Blank input means zero. Surrounding whitespace is ignored.
///
/// # Errors
///
/// * [`IncomeInputError::NotANumber`] if the text is not a decimal number.
/// * [`IncomeInputError::Negative`] if the number is below zero.
pub fn parse_amount(input: &str) -> Result<Decimal, IncomeInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| IncomeInputError::NotANumber(trimmed.to_string()))?;

    if value < Decimal::ZERO {
        return Err(IncomeInputError::Negative(value));
    }

    Ok(value)
}

/// Outcome of applying deductions to gross income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxableIncomeResult {
    pub gross_income: Decimal,
    /// Deductions matched from the table, in the order they were claimed.
    pub applied: Vec<Deduction>,
    /// Claimed codes with no entry in the table, upper-cased.
    pub unknown_codes: Vec<String>,
    pub other_deduction: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
}

impl TaxableIncomeResult {
    /// Codes of the applied deductions, in claim order.
    pub fn applied_codes(&self) -> Vec<&str> {
        self.applied.iter().map(|d| d.code.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaxableIncomeWorksheet<'a> {
    table: &'a DeductionTable,
}

impl<'a> TaxableIncomeWorksheet<'a> {
    pub fn new(table: &'a DeductionTable) -> Self {
        Self { table }
    }

    /// Applies the claimed deduction `codes` plus `other_deduction` to
    /// `gross_income`.
    ///
    /// Codes are trimmed and upper-cased; blank codes are skipped and codes
    /// not in the table are reported in
    /// [`TaxableIncomeResult::unknown_codes`]. A code claimed twice counts
    /// twice.
    pub fn calculate<S: AsRef<str>>(
        &self,
        gross_income: Decimal,
        codes: &[S],
        other_deduction: Decimal,
    ) -> TaxableIncomeResult {
        let mut applied = Vec::new();
        let mut unknown_codes = Vec::new();

        for code in codes {
            let code = normalize_code(code.as_ref());
            if code.is_empty() {
                continue;
            }
            match self.table.get(&code) {
                Some(deduction) => applied.push(deduction.clone()),
                None => unknown_codes.push(code),
            }
        }

        let claimed: Decimal = applied.iter().map(|d| d.amount).sum();
        let total_deductions = claimed + other_deduction;
        let taxable_income = clamp_non_negative(gross_income - total_deductions);

        TaxableIncomeResult {
            gross_income,
            applied,
            unknown_codes,
            other_deduction,
            total_deductions,
            taxable_income,
        }
    }
}

/// Splits a comma-separated list of deduction codes.
pub fn split_codes(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(normalize_code)
        .filter(|code| !code.is_empty())
        .collect()
}
