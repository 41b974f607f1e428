//! XDG-style path utilities for configuration and settings files.
//!
//! XDG Base Directory conventions are preferred over OS-specific locations
//! so the layout is identical on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "ltr";

/// Returns the configuration directory for ltr.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/ltr` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/ltr` otherwise
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".config").join(APP_DIR))
}

/// Path of the application config (`config.toml`).
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Path of the registered-model settings (`settings.toml`).
pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.toml"))
}
