//! Project code classification.
//!
//! A project code is first tested against the relevant-project pattern. Codes
//! that fail it are [`Classification::Unmatched`] and never reach the totals.
//! Relevant codes are then tested against the non-billable pattern.

use std::fmt;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Default relevant-project families. The overhead families count as relevant
/// so that they reach the non-billable test.
pub const DEFAULT_PROJECT_PATTERN: &str = "(APP|RMG|TIC|BDN|OVN)";

/// Default internal/overhead families.
pub const DEFAULT_NON_BILLABLE_PATTERN: &str = "(BDN|OVN)";

/// How a project code's hours are attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Billable,
    NonBillable,
    Unmatched,
}

impl Classification {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Billable => "billable",
            Self::NonBillable => "non-billable",
            Self::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a pattern that does not compile.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid {which} pattern {pattern:?}")]
    InvalidPattern {
        which: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Pattern-based project code classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    project: Regex,
    non_billable: Regex,
}

impl Classifier {
    /// Compiles a classifier from the relevant-project and non-billable patterns.
    pub fn new(project: &str, non_billable: &str) -> Result<Self, ClassifierError> {
        Ok(Self {
            project: compile("project", project)?,
            non_billable: compile("non-billable", non_billable)?,
        })
    }

    /// Classifies a project code. Same code, same answer.
    pub fn classify(&self, project_code: &str) -> Classification {
        if self.project.is_match(project_code) {
            if self.non_billable.is_match(project_code) {
                Classification::NonBillable
            } else {
                Classification::Billable
            }
        } else {
            Classification::Unmatched
        }
    }

    pub fn project_pattern(&self) -> &str {
        self.project.as_str()
    }

    pub fn non_billable_pattern(&self) -> &str {
        self.non_billable.as_str()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        // The built-in patterns are literals and always compile.
        Self {
            project: Regex::new(DEFAULT_PROJECT_PATTERN).unwrap(),
            non_billable: Regex::new(DEFAULT_NON_BILLABLE_PATTERN).unwrap(),
        }
    }
}

fn compile(which: &'static str, pattern: &str) -> Result<Regex, ClassifierError> {
    Regex::new(pattern).map_err(|source| ClassifierError::InvalidPattern {
        which,
        pattern: pattern.to_string(),
        source,
    })
}
