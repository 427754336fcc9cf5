//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Timesheet tally.
///
/// Reads a directory of timesheet workbooks and totals hours by project code
/// and by user, with revenue derived from a rate table.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Total every timesheet in the source directory and print a report.
    Report {
        /// Directory of timesheet workbooks (overrides `source_dir`).
        #[arg(long)]
        source: Option<PathBuf>,

        /// Rate table CSV (overrides `rates_path`).
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Treat the last populated row of each sheet as data.
        #[arg(long)]
        include_last_row: bool,
    },

    /// Show how project codes are classified.
    Classify {
        /// Project codes to classify.
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

/// Report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}
