//! Core logic for timesheet tallies.
//!
//! This crate contains:
//! - Classification: deciding whether a project code is billable, non-billable or irrelevant
//! - Totals: folding observations into per-project, per-user and grand sums
//! - Revenue: deriving per-user revenue from a rate table

mod classify;
mod revenue;
mod totals;

pub use classify::{
    Classification, Classifier, ClassifierError, DEFAULT_NON_BILLABLE_PATTERN,
    DEFAULT_PROJECT_PATTERN,
};
pub use revenue::{RateTable, Revenue, apply_revenue, normalize_user};
pub use totals::{GrandTotals, Observation, Totals, UserTotals};
