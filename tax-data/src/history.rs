//! Append-only logs: tax calculations and price lookups.
//!
//! Each append opens the file, writes one row and closes it again; the header
//! is written only when the file is first created.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use tax_core::SlabTaxResult;
use tax_core::calculations::TaxableIncomeResult;
use tracing::debug;

use crate::error::DataError;
use crate::files::{PRICE_AUDIT_HEADER, TAX_HISTORY_HEADER, ensure_csv};

/// One completed tax calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxHistoryRow {
    pub username: String,
    pub date: DateTime<Utc>,
    pub gross_income: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub tax: Decimal,
    pub total_tax: Decimal,
}

impl TaxHistoryRow {
    pub fn new(
        username: impl Into<String>,
        date: DateTime<Utc>,
        income: &TaxableIncomeResult,
        tax: &SlabTaxResult,
    ) -> Self {
        Self {
            username: username.into(),
            date,
            gross_income: income.gross_income,
            total_deductions: income.total_deductions,
            taxable_income: income.taxable_income,
            // No surcharge or cess yet, so both columns carry the slab total.
            tax: tax.total_tax,
            total_tax: tax.total_tax,
        }
    }

    fn to_record(&self) -> [String; 7] {
        [
            self.username.clone(),
            self.date.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.2}", self.gross_income),
            format!("{:.2}", self.total_deductions),
            format!("{:.2}", self.taxable_income),
            format!("{:.2}", self.tax),
            format!("{:.2}", self.total_tax),
        ]
    }
}

/// One price lookup and the source that answered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceAuditRow {
    pub username: String,
    pub ticker: String,
    pub query_date: DateTime<Utc>,
    /// Name of the provider that served the series.
    pub info_note: String,
}

impl PriceAuditRow {
    fn to_record(&self) -> [String; 4] {
        [
            self.username.clone(),
            self.ticker.clone(),
            self.query_date.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.info_note.clone(),
        ]
    }
}

fn append_record<const N: usize>(
    path: &Path,
    header: &[&str; N],
    record: [String; N],
) -> Result<(), DataError> {
    ensure_csv(path, header)?;

    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| DataError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(&record)?;
    writer.flush().map_err(|e| DataError::io(path, e))?;

    debug!(path = %path.display(), "appended row");
    Ok(())
}

#[derive(Debug, Clone)]
pub struct TaxHistoryLog {
    path: PathBuf,
}

impl TaxHistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(
        &self,
        row: &TaxHistoryRow,
    ) -> Result<(), DataError> {
        append_record(&self.path, &TAX_HISTORY_HEADER, row.to_record())
    }
}

#[derive(Debug, Clone)]
pub struct PriceAuditLog {
    path: PathBuf,
}

impl PriceAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(
        &self,
        row: &PriceAuditRow,
    ) -> Result<(), DataError> {
        append_record(&self.path, &PRICE_AUDIT_HEADER, row.to_record())
    }
}
