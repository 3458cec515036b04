//! The deduction table on disk.
//!
//! ```csv
//! code,amount,description
//! HRA,150000,House Rent Allowance cap example
//! MED,25000,Medical expense cap example
//! ```
//!
//! Reading is lenient: a row with no code is skipped and an amount that does
//! not parse counts as zero. A file with no usable rows is replaced by the
//! seeded table.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::calculations::parse_amount;
use tax_core::{Deduction, DeductionTable};
use tracing::{info, warn};

use crate::error::DataError;
use crate::files::{DEDUCTIONS_HEADER, ensure_csv};

#[derive(Debug, Deserialize)]
struct DeductionRow {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Parses deduction rows from any reader.
pub fn read_deductions<R: Read>(reader: R) -> Result<DeductionTable, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut table = DeductionTable::new();
    for (idx, result) in csv_reader.deserialize::<DeductionRow>().enumerate() {
        let row = result?;
        let Some(code) = row.code.filter(|c| !c.trim().is_empty()) else {
            continue;
        };

        let raw_amount = row.amount.unwrap_or_default();
        let amount = parse_amount(&raw_amount).unwrap_or_else(|err| {
            warn!(row = idx + 1, %code, %err, "unusable deduction amount, using 0");
            Decimal::ZERO
        });

        table.upsert(Deduction {
            code,
            amount,
            description: row.description.unwrap_or_default(),
        });
    }

    Ok(table)
}

/// Loads and saves `deductions.csv`.
#[derive(Debug, Clone)]
pub struct DeductionStore {
    path: PathBuf,
}

impl DeductionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the table, creating the file if needed. An empty table is
    /// replaced by [`DeductionTable::seeded`] and written back.
    pub fn load(&self) -> Result<DeductionTable, DataError> {
        ensure_csv(&self.path, &DEDUCTIONS_HEADER)?;

        let file = File::open(&self.path).map_err(|e| DataError::io(&self.path, e))?;
        let table = read_deductions(file)?;
        if !table.is_empty() {
            return Ok(table);
        }

        info!(path = %self.path.display(), "no deductions on file, writing defaults");
        let seeded = DeductionTable::seeded();
        self.save(&seeded)?;
        Ok(seeded)
    }

    /// Rewrites the whole file from `table`, ordered by code.
    pub fn save(
        &self,
        table: &DeductionTable,
    ) -> Result<(), DataError> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(DEDUCTIONS_HEADER)?;
        for deduction in table.iter() {
            writer.write_record([
                deduction.code.as_str(),
                deduction.amount.to_string().as_str(),
                deduction.description.as_str(),
            ])?;
        }
        writer.flush().map_err(|e| DataError::io(&self.path, e))?;
        Ok(())
    }
}
