//! Configuration errors

use std::io;
use std::path::PathBuf;
use treedoc_value::DocumentError;

/// Errors raised while loading or storing configuration.
///
/// Typed reads never produce these; they degrade to defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Include directory '{path}': {reason}")]
    IncludeDir { path: String, reason: String },

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("Could not determine a home directory")]
    NoHome,

    #[error("System configuration file does not exist: {0}")]
    MissingSystemFile(PathBuf),
}
