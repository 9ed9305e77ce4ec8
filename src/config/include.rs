//! Include-directory loading
//!
//! A document naming an include directory has every matching file below
//! that directory merged into it, in a deterministic order:
//! case-insensitive path order, ties broken by exact path order.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use treedoc_value::{path, Document};
use walkdir::WalkDir;

use super::error::ConfigError;
use super::merge::merge_fragment;

/// Key naming the directory whose fragments are merged in.
pub const INCLUDE_DIR_KEY: &str = "includeConfigDir";

/// Key listing the file extensions (without dot) to merge.
pub const INCLUDE_EXT_KEY: &str = "includeConfigExt";

/// Extensions used when the document does not list any.
pub const DEFAULT_EXTENSIONS: &[&str] = &["json"];

/// A merged fragment with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FragmentSource {
    /// File path as listed from the include directory
    pub path: String,

    /// SHA-256 digest of the raw file bytes
    pub sha256: String,
}

/// List the fragment files under `dir` (recursively) whose names end with
/// one of `extensions`, in merge order.
pub fn list_fragments(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let matcher = extension_matcher(extensions)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| ConfigError::IncludeDir {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| compare_paths(a, b));
    Ok(files)
}

/// Merge every fragment under `dir` into `target`.
///
/// A fragment that cannot be read or parsed is logged and skipped; the
/// remaining fragments are still merged.
pub fn merge_directory(
    target: &mut Document,
    dir: &Path,
    extensions: &[String],
) -> Result<Vec<FragmentSource>, ConfigError> {
    let files = list_fragments(dir, extensions)?;
    let mut merged = Vec::with_capacity(files.len());

    for file in files {
        let bytes = match fs::read(&file) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(path = %file.display(), error = %e, "Failed to read fragment");
                continue;
            }
        };
        let fragment = match Document::from_slice(&bytes) {
            Ok(fragment) => fragment,
            Err(e) => {
                error!(path = %file.display(), error = %e, "Failed to load fragment");
                continue;
            }
        };

        merge_fragment(target.root_mut(), fragment.into_map());
        merged.push(FragmentSource {
            path: file.to_string_lossy().to_string(),
            sha256: hex::encode(Sha256::digest(&bytes)),
        });
    }

    Ok(merged)
}

/// Merge the include directory named by `document` itself, if it names one.
///
/// Returns the merged fragments, empty when the document has no
/// [`INCLUDE_DIR_KEY`].
pub fn load_include_dir(document: &mut Document) -> Result<Vec<FragmentSource>, ConfigError> {
    if !document.root().contains_key(INCLUDE_DIR_KEY) {
        return Ok(Vec::new());
    }

    let dir = document
        .get_string(None, &path![INCLUDE_DIR_KEY])
        .ok_or_else(|| ConfigError::IncludeDir {
            path: INCLUDE_DIR_KEY.to_string(),
            reason: "value is not a directory path".to_string(),
        })?;
    let extensions = document
        .get_string_list(&path![INCLUDE_EXT_KEY])
        .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect());

    debug!(dir = %dir, extensions = ?extensions, "Merging include directory");
    merge_directory(document, Path::new(&dir), &extensions)
}

fn extension_matcher(extensions: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for extension in extensions {
        let extension = extension.trim_start_matches('.');
        builder.add(Glob::new(&format!("*.{}", extension))?);
    }
    Ok(builder.build()?)
}

fn compare_paths(a: &Path, b: &Path) -> Ordering {
    let a = a.to_string_lossy();
    let b = b.to_string_lossy();
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(&b))
}
