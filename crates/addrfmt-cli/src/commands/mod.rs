//! Subcommands and the setup they share.

pub mod config;
pub mod format;
pub mod info;
pub mod parse;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use addrfmt_core::{AddrConfig, LocaleStore};

/// Configuration file used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("addrfmt")
        .join("config.json")
}

/// The config file to read and write: the explicit one, else the default.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration. An explicitly named file must exist; the default
/// file is optional.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<AddrConfig> {
    let path = config_path(explicit);
    if explicit.is_some() && !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        return Ok(AddrConfig::from_file(&path)?);
    }
    Ok(AddrConfig::default())
}

/// Locale store for a command, with any extra data directories searched
/// ahead of the configured ones.
pub fn open_store(config: &AddrConfig, extra_dirs: &[PathBuf]) -> Arc<LocaleStore> {
    let mut config = config.clone();
    if !extra_dirs.is_empty() {
        let mut dirs = extra_dirs.to_vec();
        dirs.append(&mut config.data.data_dirs);
        config.data.data_dirs = dirs;
    }
    Arc::new(LocaleStore::from_config(&config))
}

/// Command input: the argument, else the file, else stdin.
pub fn read_input(arg: Option<String>, file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    if let Some(path) = file {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
