mod deduction;
mod tax_breakdown;
mod tax_slab;

pub use deduction::{Deduction, DeductionTable};
pub(crate) use deduction::normalize_code;
pub use tax_breakdown::{SlabTaxResult, TaxBreakdownEntry};
pub use tax_slab::{SlabSchedule, SlabScheduleError, TaxSlab};
