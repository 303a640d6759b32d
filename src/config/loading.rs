//! Configuration loading from disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use crate::common::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// `$XDG_CONFIG_HOME/sunshade/sunshade.toml` (or the platform equivalent).
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the default configuration file. A missing file yields an empty config.
pub fn load() -> Result<Config> {
    let path = default_config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    load_from_path(&path)
}

/// Load a specific configuration file, which must exist.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    Config::from_toml_str(&content)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
