//! Row extraction from loaded spreadsheets.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, open_workbook_auto};
use thiserror::Error;

use crate::cell::{CellRef, CellValue};

/// Errors opening a sheet or addressing its cells.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The workbook could not be opened or parsed.
    #[error("failed to open workbook {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    /// The workbook has no worksheet to read.
    #[error("workbook {0} has no worksheets")]
    NoWorksheet(PathBuf),
    /// A cell or column address is malformed.
    #[error("invalid cell address: {0:?}")]
    InvalidAddress(String),
}

/// Read access to the calculated values of one worksheet.
pub trait CellSource {
    /// Returns the value at `at`, or [`CellValue::Empty`] outside the used area.
    fn cell(&self, at: CellRef) -> CellValue;

    /// Returns the 1-indexed highest populated row, or 0 for an empty sheet.
    fn last_row(&self) -> u32;
}

/// The first worksheet of a workbook on disk.
///
/// Formula cells yield the value cached by the application that saved the
/// workbook.
#[derive(Debug, Clone)]
pub struct XlsxSheet {
    range: Range<Data>,
}

impl XlsxSheet {
    /// Opens a workbook (xlsx, xlsm, xlsb, xls or ods) and loads its first worksheet.
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let open_error = |source| SheetError::Open {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = open_workbook_auto(path).map_err(open_error)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SheetError::NoWorksheet(path.to_path_buf()))?
            .map_err(open_error)?;
        Ok(Self { range })
    }
}

impl CellSource for XlsxSheet {
    fn cell(&self, at: CellRef) -> CellValue {
        if at.row == 0 || at.column == 0 {
            return CellValue::Empty;
        }
        self.range
            .get_value((at.row - 1, at.column - 1))
            .map_or(CellValue::Empty, convert)
    }

    fn last_row(&self) -> u32 {
        self.range.end().map_or(0, |(row, _)| row + 1)
    }
}

#[allow(clippy::cast_precision_loss)]
fn convert(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

/// An in-memory worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    cells: BTreeMap<CellRef, CellValue>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell, returning the sheet for chaining.
    #[must_use]
    pub fn with(mut self, at: CellRef, value: impl Into<CellValue>) -> Self {
        self.set(at, value);
        self
    }

    pub fn set(&mut self, at: CellRef, value: impl Into<CellValue>) {
        self.cells.insert(at, value.into());
    }
}

impl CellSource for MemorySheet {
    fn cell(&self, at: CellRef) -> CellValue {
        self.cells.get(&at).cloned().unwrap_or(CellValue::Empty)
    }

    fn last_row(&self) -> u32 {
        self.cells
            .iter()
            .filter(|(_, value)| **value != CellValue::Empty)
            .map(|(at, _)| at.row)
            .max()
            .unwrap_or(0)
    }
}
