//! Global configuration parsing and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

fn default_helper_timeout_seconds() -> u64 {
    120
}

/// Global configuration parsed from `config.toml`.
///
/// Every field has a serde default so an empty file (or no file at all)
/// yields a working configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct GlobalConfig {
    /// Wall-clock bound for shell helper operations (probe, version, install).
    pub helper_timeout_seconds: u64,
    /// Working directory for chat sessions; defaults to the user's home directory.
    pub working_dir: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            helper_timeout_seconds: default_helper_timeout_seconds(),
            working_dir: None,
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read, parsed,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("cannot read config: {err}")))?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Helper operation timeout as a [`Duration`].
    #[must_use]
    pub fn helper_timeout(&self) -> Duration {
        Duration::from_secs(self.helper_timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.helper_timeout_seconds == 0 {
            return Err(AppError::Config(
                "helper_timeout_seconds must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
