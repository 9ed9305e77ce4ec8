//! Documents: an object-rooted value tree plus read/write helpers.

use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path as FsPath;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

use crate::coerce;
use crate::engine;
use crate::error::{kind_name, DocumentError};
use crate::path::Segment;
use crate::serialize::serialize_value;
use crate::substitute::Properties;
use crate::Map;

/// A mutable JSON document whose root is always an object.
///
/// When the parsed text was an array, the first object found inside it
/// (descending through leading nested arrays) becomes the root and the
/// original array stays available through [`Document::source_array`].
///
/// String reads apply `${name}` substitution unless it is switched off with
/// [`Document::set_property_substitution`].
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
    source_array: Option<Vec<Value>>,
    substitute: bool,
    properties: Arc<Properties>,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_map(Map::new())
    }
}

/// Documents compare by their root tree only.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map) -> Self {
        Self {
            root: Value::Object(map),
            source_array: None,
            substitute: true,
            properties: Arc::new(Properties::default()),
        }
    }

    /// Build a document from an already parsed value.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Array(items) => {
                let root = promote_from_array(&items)?;
                let mut document = Self::from_map(root);
                document.source_array = Some(items);
                Ok(document)
            }
            other => Err(DocumentError::NotAnObject {
                found: kind_name(&other),
            }),
        }
    }

    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Read the whole stream, then parse it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DocumentError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_slice(&bytes)
    }

    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self, DocumentError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_slice(&bytes)
    }

    /// The root object.
    pub fn root(&self) -> &Map {
        self.root
            .as_object()
            .expect("document root is always an object")
    }

    /// Live, writable access to the root object.
    ///
    /// Changes made through this map are changes to the document. Read-only
    /// consumers should prefer [`Document::get_sub_document`], which returns
    /// an owned snapshot.
    pub fn root_mut(&mut self) -> &mut Map {
        self.root
            .as_object_mut()
            .expect("document root is always an object")
    }

    pub fn into_map(self) -> Map {
        match self.root {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// The top-level array the root was promoted from, if any.
    pub fn source_array(&self) -> Option<&[Value]> {
        self.source_array.as_deref()
    }

    pub fn set_property_substitution(&mut self, enabled: bool) {
        self.substitute = enabled;
    }

    pub fn property_substitution(&self) -> bool {
        self.substitute
    }

    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = Arc::new(properties);
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    fn substituted(&self, text: String) -> String {
        if self.substitute {
            self.properties.substitute(&text)
        } else {
            text
        }
    }

    /// A new document over `map` carrying this document's substitution settings.
    fn derived(&self, map: Map) -> Document {
        Document {
            root: Value::Object(map),
            source_array: None,
            substitute: self.substitute,
            properties: Arc::clone(&self.properties),
        }
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Node at `path`, or `None` when the path does not resolve.
    pub fn get_path(&self, path: &[Segment]) -> Option<&Value> {
        engine::get_path(&self.root, path)
    }

    /// Mutable node at `path`. The root itself is only reachable through
    /// [`Document::root_mut`], so an empty path yields `None`.
    pub fn get_path_mut(&mut self, path: &[Segment]) -> Option<&mut Value> {
        if path.is_empty() {
            return None;
        }
        engine::get_path_mut(&mut self.root, path)
    }

    pub fn get_object(&self, path: &[Segment]) -> Option<&Map> {
        self.get_path(path)?.as_object()
    }

    pub fn get_object_mut(&mut self, path: &[Segment]) -> Option<&mut Map> {
        self.get_path_mut(path)?.as_object_mut()
    }

    pub fn get_array(&self, path: &[Segment]) -> Option<&Vec<Value>> {
        self.get_path(path)?.as_array()
    }

    pub fn get_string(&self, default: Option<&str>, path: &[Segment]) -> Option<String> {
        coerce::to_string(self.get_path(path), default).map(|text| self.substituted(text))
    }

    pub fn get_integer(&self, default: Option<i64>, path: &[Segment]) -> Option<i64> {
        coerce::to_integer(self.get_path(path), default)
    }

    pub fn get_boolean(&self, default: Option<bool>, path: &[Segment]) -> Option<bool> {
        coerce::to_boolean(self.get_path(path), default)
    }

    pub fn get_string_list(&self, path: &[Segment]) -> Option<Vec<String>> {
        coerce::to_string_list(self.get_path(path)).map(|list| {
            list.into_iter()
                .map(|text| self.substituted(text))
                .collect()
        })
    }

    /// Owned snapshot of the object at `path`.
    pub fn get_sub_document(&self, path: &[Segment]) -> Option<Document> {
        self.get_object(path).map(|map| self.derived(map.clone()))
    }

    /// Snapshots of every object element of the array at `path`.
    pub fn get_document_list(&self, path: &[Segment]) -> Option<Vec<Document>> {
        let items = self.get_array(path)?;
        Some(
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|map| self.derived(map.clone()))
                .collect(),
        )
    }

    /// Snapshots of every object-valued entry of the object at `path`, in order.
    pub fn get_document_map(&self, path: &[Segment]) -> Option<Vec<(String, Document)>> {
        let map = self.get_object(path)?;
        Some(
            map.iter()
                .filter_map(|(key, value)| {
                    value
                        .as_object()
                        .map(|child| (key.clone(), self.derived(child.clone())))
                })
                .collect(),
        )
    }

    /// Every value stored under `key`, at any depth.
    ///
    /// Depth-first in key order. Descends into objects, and into the object
    /// elements of arrays.
    pub fn search(&self, key: &str) -> Vec<&Value> {
        let mut found = Vec::new();
        search_map(self.root(), key, &mut found);
        found
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// See [`engine::write_path`].
    pub fn write_path(&mut self, path: &[Segment], default_leaf: Value) -> Option<&mut Value> {
        if path.is_empty() {
            return None;
        }
        engine::write_path(&mut self.root, path, default_leaf)
    }

    /// Object at `path`, created if missing. `None` if something else lives there.
    pub fn write_object(&mut self, path: &[Segment]) -> Option<&mut Map> {
        self.write_path(path, Value::Object(Map::new()))?
            .as_object_mut()
    }

    /// Array at `path`, created if missing. `None` if something else lives there.
    pub fn write_array(&mut self, path: &[Segment]) -> Option<&mut Vec<Value>> {
        self.write_path(path, Value::Array(Vec::new()))?
            .as_array_mut()
    }

    /// See [`engine::write_value`].
    pub fn write_value(&mut self, path: &[Segment], value: Value) -> Option<&mut Value> {
        engine::write_value(&mut self.root, path, value)
    }

    pub fn write_string(&mut self, path: &[Segment], value: impl Into<String>) -> Option<&mut Value> {
        self.write_value(path, Value::String(value.into()))
    }

    // ---------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------

    pub fn to_json_string(&self, pretty: bool) -> String {
        serialize_value(&self.root, pretty)
    }

    pub fn write_to<W: Write>(&self, mut writer: W, pretty: bool) -> io::Result<()> {
        writer.write_all(self.to_json_string(pretty).as_bytes())?;
        writer.flush()
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Compact text form.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string(false))
    }
}

fn promote_from_array(items: &[Value]) -> Result<Map, DocumentError> {
    match items.first() {
        None => {
            warn!("Found only an empty array, starting a new object");
            Ok(Map::new())
        }
        Some(Value::Null) => {
            warn!("Null first entry, starting a new object");
            Ok(Map::new())
        }
        Some(Value::Array(nested)) => promote_from_array(nested),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(DocumentError::NotAnObject {
            found: kind_name(other),
        }),
    }
}

fn search_map<'a>(map: &'a Map, key: &str, found: &mut Vec<&'a Value>) {
    for (name, value) in map {
        if name == key {
            found.push(value);
        }
        match value {
            Value::Object(child) => search_map(child, key, found),
            Value::Array(items) => {
                for child in items.iter().filter_map(Value::as_object) {
                    search_map(child, key, found);
                }
            }
            _ => {}
        }
    }
}
