//! Hour accumulation.
//!
//! [`Totals`] is the single aggregate built for a run. Every addition is exact
//! (`Decimal`), and all maps are ordered by key, so the result does not depend
//! on the order in which files or rows are recorded.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::classify::{Classification, Classifier};
use crate::revenue::Revenue;

/// One data row from one timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation<'a> {
    /// Normalized (lowercase) user identity. Empty means unattributable.
    pub user: &'a str,
    pub project_code: &'a str,
    pub hours: Decimal,
}

/// Accumulated hours for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserTotals {
    /// Billable plus non-billable hours.
    pub all_hours: Decimal,
    pub total_billable: Decimal,
    pub total_non_billable: Decimal,
    /// Set by [`apply_revenue`](crate::apply_revenue); `None` before that.
    pub revenue: Option<Revenue>,
}

impl UserTotals {
    fn add(&mut self, other: &Self) {
        self.all_hours += other.all_hours;
        self.total_billable += other.total_billable;
        self.total_non_billable += other.total_non_billable;
    }
}

/// Company-wide sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GrandTotals {
    pub total_billable: Decimal,
    pub total_non_billable: Decimal,
}

/// Per-project, per-user and grand totals for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    billable: BTreeMap<String, Decimal>,
    non_billable: BTreeMap<String, Decimal>,
    users: BTreeMap<String, UserTotals>,
    grand: GrandTotals,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation.
    ///
    /// Returns `None` when the observation has no user and was discarded,
    /// otherwise the classification applied to it. `Unmatched` observations
    /// leave every total untouched, `all_hours` included.
    pub fn record(
        &mut self,
        classifier: &Classifier,
        observation: &Observation<'_>,
    ) -> Option<Classification> {
        if observation.user.is_empty() {
            return None;
        }

        let classification = classifier.classify(observation.project_code);
        let hours = observation.hours;
        let bucket = match classification {
            Classification::Unmatched => return Some(classification),
            Classification::Billable => &mut self.billable,
            Classification::NonBillable => &mut self.non_billable,
        };
        *bucket
            .entry(observation.project_code.to_string())
            .or_default() += hours;

        let user = self.users.entry(observation.user.to_string()).or_default();
        if classification == Classification::Billable {
            self.grand.total_billable += hours;
            user.total_billable += hours;
        } else {
            self.grand.total_non_billable += hours;
            user.total_non_billable += hours;
        }
        user.all_hours += hours;

        Some(classification)
    }

    /// Adds a partial result into this one.
    ///
    /// Revenue is derived after the final merge, so any revenue already on
    /// either side is cleared for the users touched by `other`.
    pub fn merge(&mut self, other: Self) {
        for (code, hours) in other.billable {
            *self.billable.entry(code).or_default() += hours;
        }
        for (code, hours) in other.non_billable {
            *self.non_billable.entry(code).or_default() += hours;
        }
        for (name, totals) in other.users {
            let user = self.users.entry(name).or_default();
            user.add(&totals);
            user.revenue = None;
        }
        self.grand.total_billable += other.grand.total_billable;
        self.grand.total_non_billable += other.grand.total_non_billable;
    }

    /// Hours by billable project code.
    pub const fn billable(&self) -> &BTreeMap<String, Decimal> {
        &self.billable
    }

    /// Hours by non-billable project code.
    pub const fn non_billable(&self) -> &BTreeMap<String, Decimal> {
        &self.non_billable
    }

    pub const fn users(&self) -> &BTreeMap<String, UserTotals> {
        &self.users
    }

    pub fn user(&self, name: &str) -> Option<&UserTotals> {
        self.users.get(name)
    }

    pub(crate) fn users_mut(&mut self) -> impl Iterator<Item = (&String, &mut UserTotals)> {
        self.users.iter_mut()
    }

    pub const fn grand(&self) -> &GrandTotals {
        &self.grand
    }

    /// True when nothing has been attributed.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
