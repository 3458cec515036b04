use std::path::PathBuf;

use tax_core::SlabScheduleError;
use thiserror::Error;

/// Errors raised while reading or writing the CSV data files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A slab file row carried a rate that is not a decimal number. `row` is
    /// 1-based, header excluded.
    #[error("invalid rate '{value}' on row {row}")]
    InvalidRate { value: String, row: usize },

    #[error("invalid slab schedule: {0}")]
    Schedule(#[from] SlabScheduleError),
}

impl DataError {
    pub(crate) fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
