//! CSV files behind the tax and quote commands.
//!
//! Everything lives in one data directory (see [`DataDir`]): the deduction
//! table, free-form settings, and two append-only logs.

pub mod config;
pub mod deductions;
pub mod error;
pub mod files;
pub mod history;
pub mod slabs;

pub use config::{load_config, read_config};
pub use deductions::{DeductionStore, read_deductions};
pub use error::DataError;
pub use files::{DataDir, ensure_csv};
pub use history::{PriceAuditLog, PriceAuditRow, TaxHistoryLog, TaxHistoryRow};
pub use slabs::{load_schedule, load_schedule_file};
