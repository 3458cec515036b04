use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use price_feed::{DEFAULT_POINTS, Interval, MAX_POINTS, Period};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Slab income tax calculator and stock price tracker.
///
/// Data files (deductions, settings, history) live in the data directory and
/// are created on first use.
#[derive(Debug, Parser)]
#[command(name = "taxfolio", version)]
pub struct Cli {
    /// Directory holding the CSV data files.
    #[arg(long, global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute slab tax for an income.
    Tax(TaxArgs),

    /// Show recent prices for a ticker.
    Quote(QuoteArgs),

    /// Inspect or edit the deduction table.
    #[command(subcommand)]
    Deductions(DeductionsCommand),
}

#[derive(Debug, Clone, Args)]
pub struct TaxArgs {
    /// Gross annual income.
    #[arg(long)]
    pub income: String,

    /// Comma-separated deduction codes, e.g. `HRA,MED`.
    #[arg(long, default_value = "")]
    pub deductions: String,

    /// Additional deduction amount not covered by a code.
    #[arg(long, default_value = "0")]
    pub other: String,

    /// Name recorded in the history log.
    #[arg(long, default_value = "local")]
    pub user: String,

    /// CSV file with a custom slab schedule (`upper_bound,rate`).
    #[arg(long)]
    pub slabs: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// Ticker symbol, e.g. `AAPL` or `TCS.NS`.
    pub ticker: String,

    /// How far back to look: 5d, 1mo, 3mo, 6mo or 1y.
    #[arg(long, default_value_t = Period::default())]
    pub period: Period,

    /// Spacing between points: 1d or 1wk.
    #[arg(long, default_value_t = Interval::default())]
    pub interval: Interval,

    /// Number of points to keep, between 1 and 10000.
    #[arg(
        long,
        default_value_t = DEFAULT_POINTS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_POINTS as u64),
    )]
    pub points: usize,

    /// Name recorded in the audit log.
    #[arg(long, default_value = "local")]
    pub user: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum DeductionsCommand {
    /// Print every deduction code.
    List,

    /// Add a deduction or change its amount.
    Set {
        code: String,
        amount: String,
        /// Replaces the stored description when given.
        #[arg(long)]
        description: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tax_defaults() {
        let cli = Cli::try_parse_from(["taxfolio", "tax", "--income", "900000"]).unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("."));
        let Command::Tax(args) = cli.command else {
            panic!("expected tax command");
        };
        assert_eq!(args.income, "900000");
        assert_eq!(args.deductions, "");
        assert_eq!(args.other, "0");
        assert_eq!(args.user, "local");
        assert_eq!(args.slabs, None);
    }

    #[test]
    fn quote_parses_window() {
        let cli = Cli::try_parse_from([
            "taxfolio", "quote", "acme", "--period", "6mo", "--interval", "weekly", "--points", "12",
        ])
        .unwrap();

        let Command::Quote(args) = cli.command else {
            panic!("expected quote command");
        };
        assert_eq!(args.ticker, "acme");
        assert_eq!(args.period, Period::SixMonths);
        assert_eq!(args.interval, Interval::Weekly);
        assert_eq!(args.points, 12);
    }

    #[test]
    fn quote_rejects_unknown_period() {
        let result = Cli::try_parse_from(["taxfolio", "quote", "ACME", "--period", "fortnight"]);

        assert!(result.is_err());
    }

    #[test]
    fn quote_rejects_points_outside_range() {
        for points in ["0", "10001", "100000000"] {
            let result = Cli::try_parse_from(["taxfolio", "quote", "ACME", "--points", points]);

            assert!(result.is_err(), "--points {points} should be rejected");
        }
    }

    #[test]
    fn quote_accepts_points_at_cap() {
        let cli = Cli::try_parse_from(["taxfolio", "quote", "ACME", "--points", "10000"]).unwrap();

        let Command::Quote(args) = cli.command else {
            panic!("expected quote command");
        };
        assert_eq!(args.points, MAX_POINTS);
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "taxfolio", "deductions", "list", "--data-dir", "/tmp/tax", "--log-file", "run.log",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("/tmp/tax"));
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        assert!(matches!(cli.command, Command::Deductions(DeductionsCommand::List)));
    }

    #[test]
    fn deductions_set_takes_code_amount_and_description() {
        let cli = Cli::try_parse_from([
            "taxfolio", "deductions", "set", "nps", "50000", "--description", "Pension",
        ])
        .unwrap();

        let Command::Deductions(DeductionsCommand::Set {
            code,
            amount,
            description,
        }) = cli.command
        else {
            panic!("expected deductions set");
        };
        assert_eq!(code, "nps");
        assert_eq!(amount, "50000");
        assert_eq!(description.as_deref(), Some("Pension"));
    }
}
