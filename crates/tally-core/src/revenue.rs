//! Revenue derivation from billable hours and hourly rates.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::totals::Totals;

/// Hourly rates keyed by lowercase user name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTable {
    rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    /// Builds a table from `(name, rate)` pairs. Names are trimmed and
    /// lowercased; a later duplicate replaces an earlier one.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut rates = BTreeMap::new();
        for (name, rate) in entries {
            let key = normalize_user(name.as_ref());
            if let Some(previous) = rates.insert(key.clone(), rate) {
                tracing::warn!(user = %key, %previous, %rate, "duplicate rate entry, keeping the last one");
            }
        }
        Self { rates }
    }

    /// Looks up a rate. The name is normalized first.
    pub fn rate(&self, user: &str) -> Option<Decimal> {
        self.rates.get(&normalize_user(user)).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Revenue derived for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Revenue {
    /// Billable hours times the user's rate, unrounded.
    Amount(Decimal),
    /// The user billed hours but has no rate.
    MissingRate,
}

impl Revenue {
    pub const fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Amount(amount) => Some(*amount),
            Self::MissingRate => None,
        }
    }
}

/// Normalizes a user identity for attribution and rate lookup.
pub fn normalize_user(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Derives revenue for every user in `totals`.
///
/// Returns the users whose revenue could not be computed, in name order.
/// A user with no rate and no billable hours is known to have earned zero.
pub fn apply_revenue(totals: &mut Totals, rates: &RateTable) -> Vec<String> {
    let mut missing = Vec::new();

    for (name, user) in totals.users_mut() {
        let revenue = match rates.rate(name) {
            Some(rate) => Revenue::Amount(rate * user.total_billable),
            None if user.total_billable.is_zero() => Revenue::Amount(Decimal::ZERO),
            None => {
                tracing::warn!(user = %name, billable = %user.total_billable, "no rate for user");
                missing.push(name.clone());
                Revenue::MissingRate
            }
        };
        user.revenue = Some(revenue);
    }

    missing
}
