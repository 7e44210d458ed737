//! User settings for Gastos
//!
//! Display preferences, page sizes for the list commands and the default
//! start date of the monthly report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::GastosPaths;
use crate::error::GastosError;

/// User settings for Gastos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Start of the monthly report when no initial date is given
    #[serde(default = "default_report_epoch")]
    pub report_epoch: NaiveDate,

    /// Page size of the expense lists
    #[serde(default = "default_expenses_per_page")]
    pub expenses_per_page: usize,

    /// Page size of the parts purchase and item lists
    #[serde(default = "default_parts_per_page")]
    pub parts_per_page: usize,

    /// Page size of every other list
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_report_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_expenses_per_page() -> usize {
    5
}

fn default_parts_per_page() -> usize {
    40
}

fn default_page_size() -> usize {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            report_epoch: default_report_epoch(),
            expenses_per_page: default_expenses_per_page(),
            parts_per_page: default_parts_per_page(),
            default_page_size: default_page_size(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &GastosPaths) -> Result<Self, GastosError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| GastosError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| GastosError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &GastosPaths) -> Result<(), GastosError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| GastosError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| GastosError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
