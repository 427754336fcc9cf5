//! Batch ingestion of a directory of timesheets.
//!
//! Each file is scanned on the rayon pool into its own partial [`Totals`].
//! Partials are merged serially in path order, so the merged totals and the
//! warning list are the same however the pool schedules the files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tally_core::{Classifier, Totals};
use thiserror::Error;

use crate::scan::{FileReport, SheetLayout, ingest_file};
use crate::warning::Warning;

/// Conditions that stop a batch before any file is read.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read source directory {path}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no input files in {0}")]
    NoInput(PathBuf),
}

/// Result of ingesting a batch of files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub totals: Totals,
    pub warnings: Vec<Warning>,
    /// Files handed to the batch.
    pub files_total: usize,
    /// Files loaded and attributed to a user.
    pub files_parsed: usize,
    pub rows_read: usize,
    pub rows_unmatched: usize,
}

impl BatchReport {
    fn absorb(&mut self, report: FileReport) {
        self.totals.merge(report.totals);
        self.warnings.extend(report.warnings);
        self.files_total += 1;
        if report.parsed {
            self.files_parsed += 1;
        }
        self.rows_read += report.rows_read;
        self.rows_unmatched += report.rows_unmatched;
    }
}

/// Lists the timesheet files in `dir`, sorted by path.
///
/// Subdirectories, hidden files and office lock files (`~$name.xlsx`) are
/// ignored.
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let dir_error = |source| IngestError::SourceDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(dir_error)? {
        let entry = entry.map_err(dir_error)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name.starts_with("~$") {
            tracing::debug!(path = ?path, "ignoring hidden or lock file");
            continue;
        }
        paths.push(path);
    }

    if paths.is_empty() {
        return Err(IngestError::NoInput(dir.to_path_buf()));
    }
    paths.sort();
    Ok(paths)
}

/// Scans every file in parallel and merges the results.
///
/// A file that fails to load is reported and skipped; it never aborts the batch.
pub fn ingest_batch(paths: &[PathBuf], layout: &SheetLayout, classifier: &Classifier) -> BatchReport {
    let reports: Vec<FileReport> = paths
        .par_iter()
        .map(|path| ingest_file(path, layout, classifier))
        .collect();

    let mut batch = BatchReport::default();
    for report in reports {
        batch.absorb(report);
    }

    tracing::info!(
        files = batch.files_total,
        parsed = batch.files_parsed,
        rows = batch.rows_read,
        unmatched = batch.rows_unmatched,
        warnings = batch.warnings.len(),
        "batch ingested"
    );
    batch
}
