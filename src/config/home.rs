//! Home directory resolution and system file management
//!
//! The home directory is resolved once at startup and passed to every
//! overlay. Resolution order:
//! 1. Explicit path (CLI flag)
//! 2. `TREEDOC_HOME` environment variable
//! 3. `<user home>/.treedoc`

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use treedoc_value::Properties;

use super::defaults::{BACKUP_SUFFIX, PACKAGED_SYSTEM_CONFIG, SYSTEM_CONFIG_FILE};
use super::error::ConfigError;

/// Environment variable naming the home directory.
pub const HOME_ENV: &str = "TREEDOC_HOME";

/// Placeholder name that resolves to the home directory in string reads.
pub const HOME_PROPERTY: &str = "treedoc.home";

/// Directory name used under the user's home when nothing else is set.
pub const DEFAULT_DIR_NAME: &str = ".treedoc";

/// Location of the system configuration and other per-installation files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeConfig {
    pub path: PathBuf,
}

impl HomeConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the home directory from an optional explicit path, the
    /// environment, or the user's home directory.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }

        if let Ok(path) = std::env::var(HOME_ENV) {
            if !path.is_empty() {
                return Ok(Self::new(path));
            }
        }

        dirs::home_dir()
            .map(|home| Self::new(home.join(DEFAULT_DIR_NAME)))
            .ok_or(ConfigError::NoHome)
    }

    /// A path below the home directory.
    pub fn join(&self, sub_path: impl AsRef<Path>) -> PathBuf {
        self.path.join(sub_path)
    }

    pub fn system_file(&self) -> PathBuf {
        self.join(SYSTEM_CONFIG_FILE)
    }

    pub fn backup_file(&self) -> PathBuf {
        self.join(format!("{}{}", SYSTEM_CONFIG_FILE, BACKUP_SUFFIX))
    }

    /// Placeholder sources for documents loaded under this home:
    /// `treedoc.home`, then the process environment.
    pub fn properties(&self) -> Properties {
        Properties::default().with_property(HOME_PROPERTY, self.path.to_string_lossy())
    }

    /// Path of the system configuration, copying the packaged default into
    /// place first if the file does not exist yet.
    pub fn ensure_system_file(&self) -> Result<PathBuf, ConfigError> {
        let file = self.system_file();
        if !file.exists() {
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&file, PACKAGED_SYSTEM_CONFIG)?;
            info!(path = %file.display(), "Default configuration copied");
        }
        Ok(file)
    }

    /// Copy the system configuration to its `.old` sibling, replacing any
    /// earlier backup.
    pub fn backup_system_file(&self) -> Result<PathBuf, ConfigError> {
        let file = self.system_file();
        if !file.exists() {
            return Err(ConfigError::MissingSystemFile(file));
        }

        let backup = self.backup_file();
        if backup.exists() {
            fs::remove_file(&backup)?;
        }
        fs::copy(&file, &backup)?;
        info!(path = %backup.display(), "Configuration copied");
        Ok(backup)
    }
}
