//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tally_core::{
    Classifier, ClassifierError, DEFAULT_NON_BILLABLE_PATTERN, DEFAULT_PROJECT_PATTERN,
};
use tally_sheets::{SheetError, SheetLayout};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one timesheet workbook per user and period.
    pub source_dir: PathBuf,
    /// CSV file with `user` and `rate` columns.
    pub rates_path: PathBuf,
    /// Regex a project code must match to be counted at all.
    pub project_pattern: String,
    /// Regex marking a counted project code as non-billable.
    pub non_billable_pattern: String,
    /// Cell holding the user identity.
    pub user_cell: String,
    pub project_column: String,
    pub hours_column: String,
    /// First data row (1-indexed).
    pub first_data_row: u32,
    /// Count the last populated row as data instead of a totals row.
    pub include_last_row: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./source"),
            rates_path: PathBuf::from("./csv/rates.csv"),
            project_pattern: DEFAULT_PROJECT_PATTERN.to_string(),
            non_billable_pattern: DEFAULT_NON_BILLABLE_PATTERN.to_string(),
            user_cell: "A3".to_string(),
            project_column: "A".to_string(),
            hours_column: "K".to_string(),
            first_data_row: 7,
            include_last_row: false,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TALLY_*)
        figment = figment.merge(Env::prefixed("TALLY_"));

        figment.extract()
    }

    /// Compiles the configured project patterns.
    pub fn classifier(&self) -> Result<Classifier, ClassifierError> {
        Classifier::new(&self.project_pattern, &self.non_billable_pattern)
    }

    /// Parses the configured sheet addresses.
    pub fn layout(&self) -> Result<SheetLayout, SheetError> {
        SheetLayout::parse(
            &self.user_cell,
            &self.project_column,
            &self.hours_column,
            self.first_data_row,
            self.include_last_row,
        )
    }
}

/// Returns the platform-specific config directory for tally.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tally"))
}
