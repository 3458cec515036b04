//! Locations of the data files and their header rows.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::DataError;

pub const DEDUCTIONS_FILE: &str = "deductions.csv";
pub const CONFIG_FILE: &str = "config.csv";
pub const TAX_HISTORY_FILE: &str = "tax_history.csv";
pub const PRICE_AUDIT_FILE: &str = "portfolio.csv";

pub const DEDUCTIONS_HEADER: [&str; 3] = ["code", "amount", "description"];
pub const CONFIG_HEADER: [&str; 2] = ["key", "value"];
pub const TAX_HISTORY_HEADER: [&str; 7] = [
    "username",
    "date",
    "gross_income",
    "total_deductions",
    "taxable_income",
    "tax",
    "total_tax",
];
pub const PRICE_AUDIT_HEADER: [&str; 4] = ["username", "ticker", "query_date", "info_note"];

/// Creates `path` containing only `header` if it does not exist yet.
///
/// Returns `true` when the file was created. Missing parent directories are
/// created too.
pub fn ensure_csv(
    path: &Path,
    header: &[&str],
) -> Result<bool, DataError> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header)?;
    writer.flush().map_err(|e| DataError::io(path, e))?;

    info!(path = %path.display(), "created data file");
    Ok(true)
}

/// The directory holding every data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn deductions(&self) -> PathBuf {
        self.root.join(DEDUCTIONS_FILE)
    }

    pub fn config(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn tax_history(&self) -> PathBuf {
        self.root.join(TAX_HISTORY_FILE)
    }

    pub fn price_audit(&self) -> PathBuf {
        self.root.join(PRICE_AUDIT_FILE)
    }

    /// Creates any missing data file with its header row.
    pub fn ensure_all(&self) -> Result<(), DataError> {
        ensure_csv(&self.deductions(), &DEDUCTIONS_HEADER)?;
        ensure_csv(&self.config(), &CONFIG_HEADER)?;
        ensure_csv(&self.tax_history(), &TAX_HISTORY_HEADER)?;
        ensure_csv(&self.price_audit(), &PRICE_AUDIT_HEADER)?;
        Ok(())
    }
}
