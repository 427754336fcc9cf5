//! Timesheet ingestion.
//!
//! Reads the calculated cell values of timesheet workbooks, turns their data
//! rows into observations for [`tally_core::Totals`], and loads the rate table.
//!
//! # Sheet layout
//!
//! By default the user identity is in `A3`, project codes are in column `A`,
//! hours in column `K`, and data starts at row 7. The highest populated row is
//! treated as a totals row and skipped unless
//! [`SheetLayout::include_last_row`] is set.

mod batch;
mod cell;
mod rates;
mod scan;
mod source;
mod warning;

pub use batch::{BatchReport, IngestError, collect_inputs, ingest_batch};
pub use cell::{CellRef, CellValue, column_index, column_name};
pub use rates::{RateTableError, load_rates};
pub use scan::{FileReport, SheetLayout, ingest_file, scan_sheet};
pub use source::{CellSource, MemorySheet, SheetError, XlsxSheet};
pub use warning::Warning;
