//! Platform-specific configuration paths.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::constants::APP_NAME;
use crate::error::{Error, Result};

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/attenua/`
/// - macOS: `~/Library/Application Support/attenua/`
/// - Windows: `%APPDATA%\attenua\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
