use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named deduction a user can claim by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    pub code: String,
    pub amount: Decimal,
    pub description: String,
}

/// Deductions keyed by upper-cased code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionTable {
    entries: BTreeMap<String, Deduction>,
}

impl DeductionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table a fresh installation starts with.
    pub fn seeded() -> Self {
        let mut table = Self::new();
        table.upsert(Deduction {
            code: "HRA".to_string(),
            amount: Decimal::from(150_000),
            description: "House Rent Allowance cap example".to_string(),
        });
        table.upsert(Deduction {
            code: "L80C".to_string(),
            amount: Decimal::from(150_000),
            description: "Section 80C investments cap example".to_string(),
        });
        table.upsert(Deduction {
            code: "MED".to_string(),
            amount: Decimal::from(25_000),
            description: "Medical expense cap example".to_string(),
        });
        table
    }

    /// Inserts or replaces a deduction. The code is trimmed and upper-cased.
    pub fn upsert(
        &mut self,
        mut deduction: Deduction,
    ) {
        deduction.code = normalize_code(&deduction.code);
        self.entries.insert(deduction.code.clone(), deduction);
    }

    pub fn get(
        &self,
        code: &str,
    ) -> Option<&Deduction> {
        self.entries.get(&normalize_code(code))
    }

    /// Deductions ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &Deduction> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Deduction> for DeductionTable {
    fn from_iter<I: IntoIterator<Item = Deduction>>(iter: I) -> Self {
        let mut table = Self::new();
        for deduction in iter {
            table.upsert(deduction);
        }
        table
    }
}

pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
