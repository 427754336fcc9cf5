//! Timesheet tally CLI library.
//!
//! This crate provides the command-line interface: argument parsing,
//! layered configuration and the report renderers.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
