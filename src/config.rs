//! Calculator configuration, loaded from TOML.
//!
//! Lookup order: an explicit path, then `$XDG_CONFIG_HOME/stackcalc/config.toml`,
//! then built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::{DEFAULT_MAX_LENGTH, DEFAULT_PRECISION};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Longest accepted expression, in bytes, after whitespace removal.
    pub max_length: usize,
    /// Decimal places kept in a formatted result.
    pub precision: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl CalculatorConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse calculator config")
    }
}

/// Default config file location, if a config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stackcalc").join("config.toml"))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is read
/// when present and defaults are used otherwise.
pub fn load_config(path: Option<&Path>) -> Result<CalculatorConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("no config file, using defaults");
                return Ok(CalculatorConfig::default());
            }
        },
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = CalculatorConfig::from_toml(&text)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}
