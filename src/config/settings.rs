//! Application settings loading from config.toml
//!
//! The dashboard's list sizes are tunable without a rebuild: how many
//! projects the top-N charts show and how many recent tickets the history
//! panel lists. Missing file or missing keys fall back to the defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const fn default_top_projects_limit() -> u64 {
    5
}

const fn default_recent_tickets_limit() -> u64 {
    10
}

/// Configuration structure representing the config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// How many projects the top-N breakdowns return
    #[serde(default = "default_top_projects_limit")]
    pub top_projects_limit: u64,
    /// How many recent project tickets the dashboard history lists
    #[serde(default = "default_recent_tickets_limit")]
    pub recent_tickets_limit: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_projects_limit: default_top_projects_limit(),
            recent_tickets_limit: default_recent_tickets_limit(),
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML syntax is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml), falling back to
/// defaults when the file does not exist.
pub fn load_default_settings() -> Result<Settings> {
    if Path::new("config.toml").exists() {
        load_settings("config.toml")
    } else {
        Ok(Settings::default())
    }
}
