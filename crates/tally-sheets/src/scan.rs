//! Per-sheet scanning: user identity, data rows, observations.

use std::path::Path;

use rust_decimal::Decimal;
use tally_core::{Classification, Classifier, Observation, Totals, normalize_user};

use crate::cell::{CellRef, column_index};
use crate::source::{CellSource, SheetError, XlsxSheet};
use crate::warning::Warning;

/// Where a timesheet keeps its user identity and data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub user_cell: CellRef,
    pub project_column: u32,
    pub hours_column: u32,
    /// First 1-indexed data row. Rows above it are never read.
    pub first_data_row: u32,
    /// Whether the highest populated row is a data row. Timesheets usually
    /// end with a totals row, so by default it is skipped.
    pub include_last_row: bool,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            user_cell: CellRef::new(1, 3),
            project_column: 1,
            hours_column: 11,
            first_data_row: 7,
            include_last_row: false,
        }
    }
}

impl SheetLayout {
    /// Builds a layout from textual addresses (`A3`, `A`, `K`).
    pub fn parse(
        user_cell: &str,
        project_column: &str,
        hours_column: &str,
        first_data_row: u32,
        include_last_row: bool,
    ) -> Result<Self, SheetError> {
        if first_data_row == 0 {
            return Err(SheetError::InvalidAddress(format!("row {first_data_row}")));
        }
        Ok(Self {
            user_cell: CellRef::parse(user_cell)?,
            project_column: column_index(project_column)?,
            hours_column: column_index(hours_column)?,
            first_data_row,
            include_last_row,
        })
    }

    /// Last row to scan given the sheet's highest populated row.
    pub const fn last_data_row(&self, last_row: u32) -> u32 {
        if self.include_last_row {
            last_row
        } else {
            last_row.saturating_sub(1)
        }
    }
}

/// What one file contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    pub totals: Totals,
    pub warnings: Vec<Warning>,
    /// Whether the file was loaded and attributed to a user.
    pub parsed: bool,
    /// Data rows with a project code.
    pub rows_read: usize,
    /// Rows whose project code matched neither pattern.
    pub rows_unmatched: usize,
}

/// Scans one loaded sheet into a partial [`Totals`].
pub fn scan_sheet<S: CellSource + ?Sized>(
    sheet: &S,
    layout: &SheetLayout,
    classifier: &Classifier,
    file: &str,
) -> FileReport {
    let mut report = FileReport::default();

    let user = normalize_user(&sheet.cell(layout.user_cell).as_text());
    if user.is_empty() {
        tracing::warn!(file, cell = %layout.user_cell, "no user identity, skipping sheet");
        report.warnings.push(Warning::MissingUserIdentity {
            file: file.to_string(),
        });
        return report;
    }
    report.parsed = true;

    let last = layout.last_data_row(sheet.last_row());
    tracing::debug!(file, %user, first = layout.first_data_row, last, "scanning sheet");

    for row in layout.first_data_row..=last {
        let code = sheet.cell(CellRef::new(layout.project_column, row)).as_text();
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        report.rows_read += 1;

        let (hours, malformed) = match sheet.cell(CellRef::new(layout.hours_column, row)).as_hours() {
            Ok(hours) => (hours, None),
            Err(value) => (Decimal::ZERO, Some(value)),
        };

        let observation = Observation {
            user: &user,
            project_code: code,
            hours,
        };
        match report.totals.record(classifier, &observation) {
            Some(Classification::Unmatched) => {
                tracing::trace!(file, row, code, "unmatched project code");
                report.rows_unmatched += 1;
            }
            _ => {
                if let Some(value) = malformed {
                    tracing::warn!(file, row, %value, "hours value is not numeric, counting as 0");
                    report.warnings.push(Warning::MalformedNumericCell {
                        file: file.to_string(),
                        row,
                        value,
                    });
                }
            }
        }
    }

    report
}

/// Loads a workbook and scans its first worksheet. A load failure is
/// reported as [`Warning::UnreadableFile`] with no contribution.
pub fn ingest_file(path: &Path, layout: &SheetLayout, classifier: &Classifier) -> FileReport {
    let file = file_label(path);
    match XlsxSheet::open(path) {
        Ok(sheet) => scan_sheet(&sheet, layout, classifier, &file),
        Err(e) => {
            let reason = match &e {
                SheetError::Open { source, .. } => source.to_string(),
                other => other.to_string(),
            };
            tracing::warn!(%file, error = %reason, "skipping unreadable file");
            FileReport {
                warnings: vec![Warning::UnreadableFile { file, reason }],
                ..FileReport::default()
            }
        }
    }
}

/// File name used in warnings.
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
