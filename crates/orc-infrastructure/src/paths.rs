//! Path management for ORC configuration and state files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/orc/               # Config directory (platform specific)
//! ├── config.toml              # Client configuration
//! ├── state.toml               # Persisted session entries (code, taskId)
//! └── logs/                    # Front-end logs
//!     └── orc.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "orc";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for orc_core::OrcError {
    fn from(err: PathError) -> Self {
        orc_core::OrcError::config(err.to_string())
    }
}

/// Resolves every file location used by the client.
///
/// A base directory can be injected (tests, portable installs); otherwise the
/// platform config directory is used.
#[derive(Debug, Clone, Default)]
pub struct OrcPaths {
    base_dir: Option<PathBuf>,
}

impl OrcPaths {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the ORC configuration directory (e.g. `~/.config/orc/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// File holding the persisted `code` and `taskId` entries.
    pub fn state_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("state.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
