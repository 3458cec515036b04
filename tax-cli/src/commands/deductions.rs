use std::io::Write;

use anyhow::{Context, Result, bail};
use tax_core::Deduction;
use tax_core::calculations::parse_amount;
use tax_data::{DataDir, DeductionStore};
use tracing::info;

use crate::cli::DeductionsCommand;

pub fn run(
    command: &DeductionsCommand,
    data: &DataDir,
    out: &mut impl Write,
) -> Result<()> {
    if let DeductionsCommand::Set { code, .. } = command {
        check_code(code)?;
    }

    let store = DeductionStore::new(data.deductions());
    let mut table = store.load().context("cannot load deductions")?;

    match command {
        DeductionsCommand::List => {
            for deduction in table.iter() {
                writeln!(
                    out,
                    "{:<8} {:>12.2}  {}",
                    deduction.code, deduction.amount, deduction.description
                )?;
            }
        }
        DeductionsCommand::Set {
            code,
            amount,
            description,
        } => {
            let amount = parse_amount(amount).context("invalid amount")?;
            let description = match description {
                Some(text) => text.clone(),
                None => table
                    .get(code)
                    .map(|existing| existing.description.clone())
                    .unwrap_or_default(),
            };

            table.upsert(Deduction {
                code: code.clone(),
                amount,
                description,
            });
            store.save(&table).context("cannot save deductions")?;

            info!(%code, %amount, "deduction saved");
            writeln!(out, "Saved {} = {:.2}", code.trim().to_uppercase(), amount)?;
        }
    }

    Ok(())
}

// Codes are looked up from a comma-separated list, so a comma would make one
// unreachable.
fn check_code(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        bail!("enter a deduction code");
    }
    if code.contains(',') {
        bail!("deduction code '{code}' cannot contain a comma");
    }
    Ok(())
}
