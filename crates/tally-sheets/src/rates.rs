//! Rate table loading.
//!
//! The rate table is a CSV file with a header row and `user` and `rate`
//! columns. Rates may carry a `$` prefix and thousands separators.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tally_core::RateTable;
use thiserror::Error;

/// Errors loading the rate table. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("failed to read rate table {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid rate {value:?} for {user:?} in {path} (line {line})")]
    InvalidRate {
        path: PathBuf,
        line: u64,
        user: String,
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct RateRecord {
    #[serde(alias = "name", alias = "username")]
    user: String,
    rate: String,
}

/// Loads a rate table from a CSV file.
pub fn load_rates(path: &Path) -> Result<RateTable, RateTableError> {
    let csv_error = |source| RateTableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut entries = Vec::new();
    for (index, result) in reader.deserialize::<RateRecord>().enumerate() {
        let record = result.map_err(csv_error)?;
        if record.user.is_empty() {
            continue;
        }
        let rate = parse_rate(&record.rate).ok_or_else(|| RateTableError::InvalidRate {
            path: path.to_path_buf(),
            line: index as u64 + 2,
            user: record.user.clone(),
            value: record.rate.clone(),
        })?;
        entries.push((record.user, rate));
    }

    let rates = RateTable::from_entries(entries);
    if rates.is_empty() {
        tracing::warn!(path = %path.display(), "rate table has no entries");
    } else {
        tracing::debug!(path = %path.display(), entries = rates.len(), "loaded rate table");
    }
    Ok(rates)
}

/// Parses `50`, `50.00`, `$1,250.5`. Negative rates are rejected.
fn parse_rate(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let rate: Decimal = cleaned.trim().parse().ok()?;
    (!rate.is_sign_negative()).then_some(rate)
}
