//! Two-tier configuration overlay
//!
//! An instance document backed by the system document. Reads try the
//! instance first and fall back to the system document only when the
//! instance has nothing usable at that path; a present `false` or empty
//! string is a real answer. Writes only ever touch the instance document,
//! and only [`ConfigOverlay::store_system_config`] persists anything.

use std::fs;
use std::io::Read;
use std::path::{Path as FsPath, PathBuf};
use tracing::{debug, error, info};
use treedoc_value::{path, Document, Map, Segment, Value};

use super::defaults::packaged_version;
use super::error::ConfigError;
use super::home::HomeConfig;
use super::include::{load_include_dir, FragmentSource};

/// Instance configuration layered over the system configuration.
#[derive(Debug, Clone)]
pub struct ConfigOverlay {
    home: HomeConfig,
    instance: Document,
    system: Document,
    instance_fragments: Vec<FragmentSource>,
    system_fragments: Vec<FragmentSource>,
}

impl ConfigOverlay {
    /// The system configuration on its own: the instance tier is a second
    /// copy of the system file. The file is bootstrapped from the packaged
    /// default when missing.
    pub fn system(home: HomeConfig) -> Result<Self, ConfigError> {
        let file = home.ensure_system_file()?;
        let instance = Document::from_file(&file)?;
        Self::from_document(home, instance)
    }

    pub fn from_file(home: HomeConfig, path: impl AsRef<FsPath>) -> Result<Self, ConfigError> {
        let instance = Document::from_file(path)?;
        Self::from_document(home, instance)
    }

    pub fn from_reader<R: Read>(home: HomeConfig, reader: R) -> Result<Self, ConfigError> {
        let instance = Document::from_reader(reader)?;
        Self::from_document(home, instance)
    }

    pub fn parse(home: HomeConfig, text: &str) -> Result<Self, ConfigError> {
        let instance = Document::parse(text)?;
        Self::from_document(home, instance)
    }

    /// Layer `instance` over the system configuration of `home`, then merge
    /// the include directory of each tier that names one.
    ///
    /// Both tiers resolve `${treedoc.home}` and environment placeholders.
    pub fn from_document(home: HomeConfig, mut instance: Document) -> Result<Self, ConfigError> {
        let properties = home.properties();
        instance.set_properties(properties.clone());

        let file = home.ensure_system_file()?;
        let mut system = Document::from_file(&file)?;
        system.set_properties(properties);

        let mut overlay = Self {
            home,
            instance,
            system,
            instance_fragments: Vec::new(),
            system_fragments: Vec::new(),
        };
        overlay.load_include_dirs()?;
        Ok(overlay)
    }

    fn load_include_dirs(&mut self) -> Result<(), ConfigError> {
        self.instance_fragments = load_include_dir(&mut self.instance)?;
        if self.instance_fragments.is_empty() {
            debug!("Instance config merged no included fragments");
        }
        self.system_fragments = load_include_dir(&mut self.system)?;
        if self.system_fragments.is_empty() {
            debug!("System config merged no included fragments");
        }
        Ok(())
    }

    pub fn home(&self) -> &HomeConfig {
        &self.home
    }

    pub fn instance(&self) -> &Document {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut Document {
        &mut self.instance
    }

    pub fn system_document(&self) -> &Document {
        &self.system
    }

    /// Fragments merged into the instance tier, in merge order.
    pub fn instance_fragments(&self) -> &[FragmentSource] {
        &self.instance_fragments
    }

    /// Fragments merged into the system tier, in merge order.
    pub fn system_fragments(&self) -> &[FragmentSource] {
        &self.system_fragments
    }

    // ---------------------------------------------------------------------
    // Reads with fallback
    // ---------------------------------------------------------------------

    pub fn get_path(&self, path: &[Segment]) -> Option<&Value> {
        match self.instance.get_path(path) {
            Some(value) if !value.is_null() => Some(value),
            _ => self.system.get_path(path),
        }
    }

    pub fn get_object(&self, path: &[Segment]) -> Option<&Map> {
        self.instance
            .get_object(path)
            .or_else(|| self.system.get_object(path))
    }

    pub fn get_array(&self, path: &[Segment]) -> Option<&Vec<Value>> {
        self.instance
            .get_array(path)
            .or_else(|| self.system.get_array(path))
    }

    pub fn get_string(&self, default: Option<&str>, path: &[Segment]) -> Option<String> {
        self.instance
            .get_string(None, path)
            .or_else(|| self.system.get_string(default, path))
    }

    pub fn get_integer(&self, default: Option<i64>, path: &[Segment]) -> Option<i64> {
        self.instance
            .get_integer(None, path)
            .or_else(|| self.system.get_integer(default, path))
    }

    pub fn get_boolean(&self, default: Option<bool>, path: &[Segment]) -> Option<bool> {
        self.instance
            .get_boolean(None, path)
            .or_else(|| self.system.get_boolean(default, path))
    }

    pub fn get_string_list(&self, path: &[Segment]) -> Option<Vec<String>> {
        self.instance
            .get_string_list(path)
            .or_else(|| self.system.get_string_list(path))
    }

    pub fn get_sub_document(&self, path: &[Segment]) -> Option<Document> {
        self.instance
            .get_sub_document(path)
            .or_else(|| self.system.get_sub_document(path))
    }

    pub fn get_document_list(&self, path: &[Segment]) -> Option<Vec<Document>> {
        self.instance
            .get_document_list(path)
            .or_else(|| self.system.get_document_list(path))
    }

    pub fn get_document_map(&self, path: &[Segment]) -> Option<Vec<(String, Document)>> {
        self.instance
            .get_document_map(path)
            .or_else(|| self.system.get_document_map(path))
    }

    /// Every value under `key` in the instance tier, or in the system tier
    /// when the instance has none.
    pub fn search(&self, key: &str) -> Vec<&Value> {
        let found = self.instance.search(key);
        if found.is_empty() {
            self.system.search(key)
        } else {
            found
        }
    }

    /// `configured` flag, false unless set.
    pub fn is_configured(&self) -> bool {
        self.get_boolean(Some(false), &path!["configured"])
            .unwrap_or(false)
    }

    /// True when the configured `version` differs from the packaged
    /// default's. A configuration without a version is outdated; a packaged
    /// default without one never makes anything outdated.
    pub fn is_outdated(&self) -> bool {
        let Some(local) = self.get_string(None, &path!["version"]) else {
            return true;
        };

        let packaged = match packaged_version() {
            Ok(Some(version)) => version,
            Ok(None) => return false,
            Err(e) => {
                error!(error = %e, "Failed to parse packaged configuration");
                return false;
            }
        };

        if local != packaged {
            debug!(local = %local, packaged = %packaged, "Configuration versions do not match");
            return true;
        }
        false
    }

    // ---------------------------------------------------------------------
    // Writes (instance tier only)
    // ---------------------------------------------------------------------

    pub fn write_path(&mut self, path: &[Segment], default_leaf: Value) -> Option<&mut Value> {
        self.instance.write_path(path, default_leaf)
    }

    pub fn write_object(&mut self, path: &[Segment]) -> Option<&mut Map> {
        self.instance.write_object(path)
    }

    pub fn write_array(&mut self, path: &[Segment]) -> Option<&mut Vec<Value>> {
        self.instance.write_array(path)
    }

    pub fn write_value(&mut self, path: &[Segment], value: Value) -> Option<&mut Value> {
        self.instance.write_value(path, value)
    }

    pub fn write_string(&mut self, path: &[Segment], value: impl Into<String>) -> Option<&mut Value> {
        self.instance.write_string(path, value)
    }

    // ---------------------------------------------------------------------
    // System tier persistence
    // ---------------------------------------------------------------------

    /// Live root of the system document, for edits that
    /// [`ConfigOverlay::store_system_config`] will persist.
    pub fn writable_system_config(&mut self) -> &mut Map {
        self.system.root_mut()
    }

    /// Write the system document, pretty-printed, to its canonical file.
    pub fn store_system_config(&self) -> Result<PathBuf, ConfigError> {
        let file = self.home.system_file();
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, self.system.to_json_string(true))?;
        info!(path = %file.display(), "System configuration stored");
        Ok(file)
    }
}
