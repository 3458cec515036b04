pub mod calculations;
pub mod models;

pub use calculations::{SlabTaxCalculator, TaxableIncomeWorksheet, compute_tax};
pub use models::*;
