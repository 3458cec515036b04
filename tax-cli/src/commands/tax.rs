use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use tax_core::calculations::{TaxableIncomeResult, parse_amount, split_codes};
use tax_core::{SlabSchedule, SlabTaxCalculator, SlabTaxResult, TaxableIncomeWorksheet};
use tax_data::{DataDir, DeductionStore, TaxHistoryLog, TaxHistoryRow, load_schedule_file};
use tracing::{info, warn};

use crate::cli::TaxArgs;

/// Computes tax for `args`, prints the breakdown and appends a history row.
pub fn run(
    args: &TaxArgs,
    data: &DataDir,
    out: &mut impl Write,
) -> Result<()> {
    let gross = parse_amount(&args.income).context("invalid --income")?;
    let other = parse_amount(&args.other).context("invalid --other")?;
    let codes = split_codes(&args.deductions);

    let schedule = match &args.slabs {
        Some(path) => load_schedule_file(path)
            .with_context(|| format!("cannot load slab schedule from '{}'", path.display()))?,
        None => SlabSchedule::default(),
    };

    let table = DeductionStore::new(data.deductions())
        .load()
        .context("cannot load deductions")?;
    let income = TaxableIncomeWorksheet::new(&table).calculate(gross, &codes, other);
    if !income.unknown_codes.is_empty() {
        warn!(codes = ?income.unknown_codes, "ignoring unknown deduction codes");
    }

    let tax = SlabTaxCalculator::new(&schedule).calculate(income.taxable_income);
    info!(user = %args.user, taxable = %income.taxable_income, total_tax = %tax.total_tax, "tax computed");

    render(&income, &tax, out)?;

    TaxHistoryLog::new(data.tax_history())
        .append(&TaxHistoryRow::new(&args.user, Utc::now(), &income, &tax))
        .context("cannot append tax history")?;

    Ok(())
}

fn render(
    income: &TaxableIncomeResult,
    tax: &SlabTaxResult,
    out: &mut impl Write,
) -> Result<()> {
    let used = income.applied_codes();
    let used = if used.is_empty() { "None".to_string() } else { used.join(", ") };
    writeln!(out, "Used deduction codes: {used}")?;
    if !income.unknown_codes.is_empty() {
        writeln!(out, "Ignored unknown codes: {}", income.unknown_codes.join(", "))?;
    }

    for entry in &tax.breakdown {
        writeln!(
            out,
            "Slab {}: taxable {:.2}, rate {}% => tax {:.2}",
            entry.range_label,
            entry.taxable_amount,
            (entry.rate * Decimal::ONE_HUNDRED).normalize(),
            entry.tax_owed
        )?;
    }

    writeln!(out, "Other deductions: {:.2}", income.other_deduction)?;
    writeln!(
        out,
        "Total deductions: {:.2} | Taxable income: {:.2} | Total tax: {:.2}",
        income.total_deductions, income.taxable_income, tax.total_tax
    )?;
    Ok(())
}
