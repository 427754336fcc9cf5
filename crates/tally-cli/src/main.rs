use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally_cli::commands::{classify, report};
use tally_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support; stdout is reserved for the report
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Report {
            source,
            rates,
            format,
            include_last_row,
        }) => {
            let mut config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            if let Some(source) = source {
                config.source_dir.clone_from(source);
            }
            if let Some(rates) = rates {
                config.rates_path.clone_from(rates);
            }
            if *include_last_row {
                config.include_last_row = true;
            }
            tracing::debug!(?config, "loaded configuration");

            report::run(&mut std::io::stdout().lock(), &config, *format)?;
        }
        Some(Commands::Classify { codes }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            classify::run(&mut std::io::stdout().lock(), &config, codes)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
