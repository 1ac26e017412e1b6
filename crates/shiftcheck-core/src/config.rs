//! Application configuration
//!
//! Site-level settings: where the history log lives, the shared access
//! secret, and the checklist grid layout. All fields default to the
//! original deployment's values, so a config file is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grid::{GridConfig, GridError};

/// Default history log location, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "checklist_history.csv";

/// Default shared access secret.
pub const DEFAULT_PASSWORD: &str = "2226";

/// Site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the durable history log
    pub history_path: PathBuf,
    /// Shared secret gating all access
    pub password: String,
    /// Checklist layout
    pub grid: GridConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            password: DEFAULT_PASSWORD.to_string(),
            grid: GridConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate configuration from TOML.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on malformed TOML or an invalid grid.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.grid.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Whether the supplied secret grants access.
    #[inline]
    #[must_use]
    pub fn secret_matches(&self, supplied: &str) -> bool {
        supplied == self.password
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Grid layout failed validation
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.history_path, Path::new("checklist_history.csv"));
        assert_eq!(config.password, "2226");
        assert_eq!(config.grid.total_cells(), 70);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_toml_overrides_single_field() {
        let config = AppConfig::from_toml_str(r#"password = "hunter2""#).unwrap();
        assert_eq!(config.password, "hunter2");
        assert_eq!(config.history_path, Path::new("checklist_history.csv"));
    }

    #[test]
    fn invalid_grid_in_config_is_rejected() {
        let toml_src = r#"
            [grid]
            comment_item = "x"
            machines = []
            sections = []
        "#;
        assert!(matches!(
            AppConfig::from_toml_str(toml_src),
            Err(ConfigError::Grid(_))
        ));
    }

    #[test]
    fn secret_gate() {
        let config = AppConfig::default();
        assert!(config.secret_matches("2226"));
        assert!(!config.secret_matches("2227"));
        assert!(!config.secret_matches(""));
    }
}
