//! Config loading and validation.

use super::model::{CONFIG_FILE_NAME, Config};
use crate::error::{ArborError, Result};
use std::path::Path;

/// Shortest message width that still leaves room for the ellipsis.
const MIN_MESSAGE_WIDTH: usize = 4;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ArborError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ArborError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load `.arbor.yaml` from `repo_root`, or the defaults when there is none.
    pub fn load_for_repo<P: AsRef<Path>>(repo_root: P) -> Result<Self> {
        let path = repo_root.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        tracing::debug!(path = %path.display(), "loading config");
        Self::load(path)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ArborError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ArborError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `target_branch` and `remote` must be non-empty
    /// - `commit_display_limit` must be positive
    /// - `message_width` must leave room for the `...` suffix
    pub fn validate(&self) -> Result<()> {
        if self.target_branch.trim().is_empty() {
            return Err(ArborError::Config(
                "target_branch must not be empty".to_string(),
            ));
        }

        if self.remote.trim().is_empty() {
            return Err(ArborError::Config("remote must not be empty".to_string()));
        }

        if self.commit_display_limit == 0 {
            return Err(ArborError::Config(
                "commit_display_limit must be greater than 0".to_string(),
            ));
        }

        if self.message_width < MIN_MESSAGE_WIDTH {
            return Err(ArborError::Config(format!(
                "message_width must be at least {} (found {})",
                MIN_MESSAGE_WIDTH, self.message_width
            )));
        }

        Ok(())
    }
}
