use std::io;

use anyhow::Context;
use clap::Parser;
use price_feed::PriceResolver;
use tax_cli::cli::{Cli, Command};
use tax_cli::{commands, logging};
use tax_data::DataDir;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_file.as_deref(), cli.verbose)?;

    let data = DataDir::new(&cli.data_dir);
    data.ensure_all()
        .with_context(|| format!("cannot prepare data directory '{}'", cli.data_dir.display()))?;
    debug!(data_dir = %cli.data_dir.display(), "data files ready");

    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Tax(args) => commands::tax::run(args, &data, &mut out)?,
        Command::Quote(args) => {
            let config = commands::quote::resolver_config(&data)?;
            let resolver =
                PriceResolver::from_config(&config).context("cannot set up price providers")?;
            debug!(providers = ?resolver.provider_names(), "price chain");
            commands::quote::run(args, &resolver, &data, &mut out).await?;
        }
        Command::Deductions(command) => commands::deductions::run(command, &data, &mut out)?,
    }

    Ok(())
}
