//! Classify command for checking how project codes are bucketed.

use std::io::Write;

use anyhow::{Context, Result};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, codes: &[String]) -> Result<()> {
    let classifier = config
        .classifier()
        .context("invalid project patterns in configuration")?;

    let width = codes.iter().map(String::len).max().unwrap_or(0);
    for code in codes {
        writeln!(writer, "{code:<width$}  {}", classifier.classify(code))?;
    }

    Ok(())
}
