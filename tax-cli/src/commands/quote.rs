use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use price_feed::{PriceResolver, PriceWindow, Resolution, ResolverConfig};
use tax_data::{DataDir, PriceAuditLog, PriceAuditRow, load_config};

use crate::cli::QuoteArgs;

/// Environment variable consulted when `config.csv` has no credential.
pub const ALPHA_VANTAGE_ENV: &str = "ALPHA_VANTAGE_KEY";

/// Builds the resolver configuration from `config.csv`, falling back to the
/// environment for the Alpha Vantage credential.
pub fn resolver_config(data: &DataDir) -> Result<ResolverConfig> {
    let settings = load_config(&data.config()).context("cannot load config.csv")?;
    Ok(config_with_env(&settings, std::env::var(ALPHA_VANTAGE_ENV).ok()))
}

fn config_with_env(
    settings: &HashMap<String, String>,
    env_key: Option<String>,
) -> ResolverConfig {
    let config = ResolverConfig::from_settings(settings);
    match (&config.alpha_vantage_key, env_key) {
        (None, Some(key)) => config.with_alpha_vantage_key(key),
        _ => config,
    }
}

/// Resolves the series for `args.ticker`, prints it and appends an audit row.
pub async fn run(
    args: &QuoteArgs,
    resolver: &PriceResolver,
    data: &DataDir,
    out: &mut impl Write,
) -> Result<()> {
    let ticker = args.ticker.trim().to_uppercase();
    if ticker.is_empty() {
        bail!("enter a ticker symbol");
    }

    let window = PriceWindow::new(args.period, args.interval, args.points);
    let resolution = resolver.resolve(&ticker, &window).await;

    render(&ticker, &resolution, out)?;

    PriceAuditLog::new(data.price_audit())
        .append(&PriceAuditRow {
            username: args.user.clone(),
            ticker,
            query_date: Utc::now(),
            info_note: resolution.source.clone(),
        })
        .context("cannot append price audit row")?;

    Ok(())
}

fn render(
    ticker: &str,
    resolution: &Resolution,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{ticker} recent prices ({})", resolution.source)?;
    for failure in &resolution.failures {
        writeln!(out, "  {} unavailable: {}", failure.provider, failure.reason)?;
    }
    for point in resolution.series.points() {
        writeln!(out, "{}  {:>10.2}", point.timestamp.format("%Y-%m-%d"), point.price)?;
    }
    Ok(())
}
