//! Test fixtures shared by the integration tests
//!
//! - `manifest.json`: a package manifest with nested nodes
//! - `system-config.json`: system tier used as a temporary home's config
//! - `fragments/`: include-directory fragments, one of them nested

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use treedoc::HomeConfig;

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Path to the manifest fixture
pub fn manifest_path() -> PathBuf {
    fixture_path("manifest.json")
}

/// Path to the fragment directory fixture
pub fn fragments_dir() -> PathBuf {
    fixture_path("fragments")
}

/// A temporary home holding the system configuration fixture.
///
/// The `TempDir` must outlive the returned home.
pub fn temp_home() -> (TempDir, HomeConfig) {
    let dir = TempDir::new().expect("create temp home");
    let home = HomeConfig::new(dir.path());
    fs::copy(fixture_path("system-config.json"), home.system_file())
        .expect("copy system config fixture");
    (dir, home)
}
