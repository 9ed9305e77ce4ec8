//! Packaged default system configuration
//!
//! Copied into the home directory the first time a system configuration is
//! needed, and used as the reference for version checks.

use treedoc_value::{path, Document, DocumentError};

/// File name of the system configuration inside the home directory.
pub const SYSTEM_CONFIG_FILE: &str = "system-config.json";

/// Suffix of the on-demand backup copy.
pub const BACKUP_SUFFIX: &str = ".old";

/// The default system configuration shipped with the binary.
pub const PACKAGED_SYSTEM_CONFIG: &str = include_str!("../../resources/system-config.json");

/// Parse the packaged default.
pub fn packaged_document() -> Result<Document, DocumentError> {
    Document::parse(PACKAGED_SYSTEM_CONFIG)
}

/// The `version` string of the packaged default, if it has one.
pub fn packaged_version() -> Result<Option<String>, DocumentError> {
    let mut document = packaged_document()?;
    document.set_property_substitution(false);
    Ok(document.get_string(None, &path!["version"]))
}
