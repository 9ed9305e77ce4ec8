//! Configuration overlay system
//!
//! Implements the 2-tier configuration lookup:
//! 1. Instance config (file, stream, string or an existing document)
//! 2. System config (<home>/system-config.json, bootstrapped from the
//!    packaged default)
//!
//! Either tier may name an include directory whose fragments are merged
//! into that tier at load time.

mod defaults;
mod error;
mod home;
mod include;
mod merge;
mod overlay;

pub use defaults::{
    packaged_document, packaged_version, BACKUP_SUFFIX, PACKAGED_SYSTEM_CONFIG, SYSTEM_CONFIG_FILE,
};
pub use error::ConfigError;
pub use home::{HomeConfig, DEFAULT_DIR_NAME, HOME_ENV, HOME_PROPERTY};
pub use include::{
    list_fragments, load_include_dir, merge_directory, FragmentSource, DEFAULT_EXTENSIONS,
    INCLUDE_DIR_KEY, INCLUDE_EXT_KEY,
};
pub use merge::{merge_all, merge_fragment};
pub use overlay::ConfigOverlay;
