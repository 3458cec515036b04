use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The share of income that fell into one slab and the tax it attracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownEntry {
    /// Human-readable range such as `250001-500000` or `1000001-inf`.
    pub range_label: String,
    pub taxable_amount: Decimal,
    pub rate: Decimal,
    pub tax_owed: Decimal,
}

/// Total tax plus the per-slab itemisation, in ascending slab order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTaxResult {
    pub total_tax: Decimal,
    pub breakdown: Vec<TaxBreakdownEntry>,
}

impl SlabTaxResult {
    /// Sum of `tax_owed` over every breakdown entry.
    pub fn breakdown_total(&self) -> Decimal {
        self.breakdown.iter().map(|entry| entry.tax_owed).sum()
    }
}
