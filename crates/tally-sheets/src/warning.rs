//! Recoverable conditions reported alongside the totals.

use serde::Serialize;
use thiserror::Error;

/// A problem that was isolated and skipped rather than aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The user identity cell was empty, so the sheet was not attributed.
    #[error("{file}: no user identity, sheet skipped")]
    MissingUserIdentity { file: String },

    /// The file could not be loaded.
    #[error("{file}: unreadable ({reason}), file skipped")]
    UnreadableFile { file: String, reason: String },

    /// An hours cell was not numeric and counted as zero.
    #[error("{file} row {row}: hours value {value:?} is not numeric, counted as 0")]
    MalformedNumericCell { file: String, row: u32, value: String },

    /// A user billed hours but has no rate, so revenue is unknown.
    #[error("{user}: billable hours but no rate, revenue unknown")]
    MissingRate { user: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_display() {
        let warning = Warning::MalformedNumericCell {
            file: "alice.xlsx".to_string(),
            row: 9,
            value: "n/a".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            r#"alice.xlsx row 9: hours value "n/a" is not numeric, counted as 0"#
        );

        let warning = Warning::MissingRate {
            user: "bob".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "bob: billable hours but no rate, revenue unknown"
        );
    }

    #[test]
    fn warnings_serialize_with_kind() {
        let warning = Warning::MissingUserIdentity {
            file: "empty.xlsx".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&warning).unwrap(),
            r#"{"kind":"missing_user_identity","file":"empty.xlsx"}"#
        );
    }
}
