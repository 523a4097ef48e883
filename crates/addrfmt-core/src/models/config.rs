//! Configuration structures for parsing and formatting.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AddrError, Result};

/// Main configuration for addrfmt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddrConfig {
    /// Locale configuration.
    pub locale: LocaleConfig,

    /// Locale data sources.
    pub data: DataConfig,

    /// Formatting configuration.
    pub format: FormatConfig,
}

/// Locale configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale used when a caller names none.
    pub default_locale: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
        }
    }
}

/// Where locale data comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directories searched for locale data, in priority order.
    pub data_dirs: Vec<PathBuf>,

    /// Fall back to the data compiled into the binary.
    pub use_embedded: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dirs: Vec::new(),
            use_embedded: true,
        }
    }
}

/// Formatting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Template style used when a caller names none.
    pub default_style: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            default_style: "default".to_string(),
        }
    }
}

impl AddrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AddrError::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
