//! Path management for Steward configuration and data files.
//!
//! ```text
//! ~/.config/steward/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/steward/      # Data directory
//! ├── exceptions/              # Default file-backed exception log
//! └── logs/                    # Default rolling log files
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "steward";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Platform-appropriate locations for Steward files (XDG on Linux).
pub struct StewardPaths;

impl StewardPaths {
    /// Returns the Steward configuration directory (e.g. `~/.config/steward/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the Steward data directory (e.g. `~/.local/share/steward/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default directory for the file-backed exception log.
    pub fn exception_log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("exceptions"))
    }

    /// Returns the default directory for rolling log files.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("logs"))
    }
}
