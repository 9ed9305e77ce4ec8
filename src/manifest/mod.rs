//! Manifest tree
//!
//! A manifest is a document whose `manifest` object holds an ordered forest
//! of nodes. Each node is an object with `id`, `title`, optional `hidden`
//! and an optional `children` object holding nested nodes by key. Map order
//! is display order, so every mutation here keeps it intact:
//! - Nodes are appended when added or moved into a parent
//! - `move_before`/`move_after` rebuild the destination's sibling map
//! - Removal always shifts, never swaps

mod node;

pub use node::ManifestNode;

use std::fmt;
use std::io::Read;
use std::path::Path as FsPath;
use std::str::FromStr;
use tracing::debug;
use treedoc_value::{path, Document, DocumentError, Map, Value};

use node::{new_node, node_path, read_node, read_nodes};

/// Top-level key holding the node forest.
pub const MANIFEST_KEY: &str = "manifest";

/// Key holding a node's own children.
pub const CHILDREN_KEY: &str = "children";

/// Prefix of the key a node is stored under: `node-<id>`.
pub const KEY_PREFIX: &str = "node-";

/// An ordered, reorderable tree of nodes over a [`Document`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    document: Document,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Document::parse(text).map(Self::from_document)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DocumentError> {
        Document::from_reader(reader).map(Self::from_document)
    }

    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self, DocumentError> {
        Document::from_file(path).map(Self::from_document)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn to_json_string(&self, pretty: bool) -> String {
        self.document.to_json_string(pretty)
    }

    // ---------------------------------------------------------------------
    // Package metadata
    // ---------------------------------------------------------------------

    pub fn title(&self) -> Option<String> {
        self.document.get_string(None, &path!["title"])
    }

    pub fn set_title(&mut self, title: &str) {
        self.set_metadata("title", title);
    }

    pub fn description(&self) -> Option<String> {
        self.document.get_string(None, &path!["description"])
    }

    pub fn set_description(&mut self, description: &str) {
        self.set_metadata("description", description);
    }

    pub fn package_type(&self) -> Option<String> {
        self.document.get_string(None, &path!["packageType"])
    }

    pub fn set_package_type(&mut self, package_type: &str) {
        self.set_metadata("packageType", package_type);
    }

    pub fn view_id(&self) -> Option<String> {
        self.document.get_string(None, &path!["viewId"])
    }

    pub fn set_view_id(&mut self, view_id: &str) {
        self.set_metadata("viewId", view_id);
    }

    fn set_metadata(&mut self, key: &str, value: &str) {
        self.document
            .root_mut()
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Top-level nodes in display order, each with its full subtree.
    pub fn top_nodes(&self) -> Vec<ManifestNode> {
        read_nodes(&self.document, &path![MANIFEST_KEY], None)
    }

    /// Number of nodes at every depth.
    pub fn size(&self) -> usize {
        self.top_nodes()
            .iter()
            .map(|node| 1 + node.descendant_count())
            .sum()
    }

    /// First node, depth-first, stored under `reference` (or under
    /// `node-<reference>` when no node has the literal key).
    pub fn get_node(&self, reference: &str) -> Option<ManifestNode> {
        let chain = self.resolve(reference)?;
        let (key, parents) = chain.split_last()?;
        Some(read_node(
            &self.document,
            node_path(&chain),
            key,
            parents.last().map(String::as_str),
        ))
    }

    /// Children of the referenced node, in display order.
    pub fn children(&self, reference: &str) -> Option<Vec<ManifestNode>> {
        self.get_node(reference).map(|node| node.children)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Append a top-level node keyed `node-<id>`.
    ///
    /// Fails only when the `manifest` entry exists and is not an object.
    pub fn add_top_node(&mut self, id: &str, title: &str) -> bool {
        match self.document.write_object(&path![MANIFEST_KEY]) {
            Some(nodes) => {
                nodes.insert(node_key(id), new_node(id, title));
                true
            }
            None => false,
        }
    }

    /// Append a node keyed `node-<id>` to the children of `parent`.
    pub fn add_child(&mut self, parent: &str, id: &str, title: &str) -> bool {
        let Some(chain) = self.resolve(parent) else {
            debug!(parent = %parent, "Parent node not found");
            return false;
        };
        match self.children_or_create(&chain) {
            Some(children) => {
                children.insert(node_key(id), new_node(id, title));
                true
            }
            None => false,
        }
    }

    pub fn set_node_title(&mut self, reference: &str, title: &str) -> bool {
        self.update_node(reference, "title", Value::String(title.to_string()))
    }

    pub fn set_node_hidden(&mut self, reference: &str, hidden: bool) -> bool {
        self.update_node(reference, "hidden", Value::Bool(hidden))
    }

    fn update_node(&mut self, reference: &str, field: &str, value: Value) -> bool {
        let Some(chain) = self.resolve(reference) else {
            return false;
        };
        match self.node_mut(&chain) {
            Some(node) => {
                node.insert(field.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Move a node to the end of `destination`'s children, or to the end of
    /// the top level when `destination` is `None`.
    ///
    /// Refused without mutation when either node is missing, when the
    /// destination is the node itself or one of its descendants, or when a
    /// different node already holds the key there.
    pub fn move_into(&mut self, id: &str, destination: Option<&str>) -> bool {
        let Some(source) = self.resolve(id) else {
            debug!(id = %id, "Node to move not found");
            return false;
        };

        let target = match destination {
            Some(reference) => match self.resolve(reference) {
                Some(chain) => Some(chain),
                None => {
                    debug!(destination = %reference, "Destination node not found");
                    return false;
                }
            },
            None => None,
        };

        if let Some(target) = &target {
            if target.starts_with(&source) {
                debug!(id = %id, "Refusing to move a node inside itself");
                return false;
            }
            if !self.children_writable(target) {
                return false;
            }
        }

        let Some((key, old_parent)) = source.split_last() else {
            return false;
        };
        let new_parent: &[String] = target.as_deref().unwrap_or(&[]);
        if old_parent != new_parent && self.key_taken(new_parent, key) {
            debug!(key = %key, "Destination already holds this key");
            return false;
        }

        let Some(moved) = self.remove_entry(old_parent, key) else {
            return false;
        };
        let container = match &target {
            Some(chain) => self.children_or_create(chain),
            None => self.manifest_mut(),
        };
        // Both ends were validated before removal.
        if let Some(container) = container {
            container.insert(key.clone(), moved);
        }
        true
    }

    /// Move a node to sit immediately before `destination` among the
    /// destination's siblings.
    pub fn move_before(&mut self, id: &str, destination: &str) -> bool {
        self.move_beside(id, destination, false)
    }

    /// Move a node to sit immediately after `destination` among the
    /// destination's siblings.
    pub fn move_after(&mut self, id: &str, destination: &str) -> bool {
        self.move_beside(id, destination, true)
    }

    fn move_beside(&mut self, id: &str, destination: &str, after: bool) -> bool {
        let (Some(source), Some(target)) = (self.resolve(id), self.resolve(destination)) else {
            debug!(id = %id, destination = %destination, "Node or destination not found");
            return false;
        };
        if target.starts_with(&source) {
            debug!(id = %id, destination = %destination, "Refusing to move a node beside itself or its descendant");
            return false;
        }

        let (Some((key, old_parent)), Some((anchor, new_parent))) =
            (source.split_last(), target.split_last())
        else {
            return false;
        };
        if old_parent != new_parent && self.key_taken(new_parent, key) {
            debug!(key = %key, "Destination parent already holds this key");
            return false;
        }

        let Some(moved) = self.remove_entry(old_parent, key) else {
            return false;
        };
        let Some(siblings) = self.manifest_mut().and_then(|map| container_mut(map, new_parent))
        else {
            return false;
        };

        let mut moved = Some(moved);
        for (sibling_key, value) in std::mem::take(siblings) {
            let is_anchor = sibling_key == *anchor;
            if is_anchor && !after {
                if let Some(node) = moved.take() {
                    siblings.insert(key.clone(), node);
                }
            }
            siblings.insert(sibling_key, value);
            if is_anchor && after {
                if let Some(node) = moved.take() {
                    siblings.insert(key.clone(), node);
                }
            }
        }
        true
    }

    /// Remove a node together with its subtree.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(chain) = self.resolve(id) else {
            return false;
        };
        match chain.split_last() {
            Some((key, parent)) => self.remove_entry(parent, key).is_some(),
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Location helpers
    // ---------------------------------------------------------------------

    /// Key chain (top-level key first) of the node a reference names.
    fn resolve(&self, reference: &str) -> Option<Vec<String>> {
        let nodes = self.manifest()?;
        locate(nodes, reference).or_else(|| locate(nodes, &node_key(reference)))
    }

    fn manifest(&self) -> Option<&Map> {
        self.document.root().get(MANIFEST_KEY)?.as_object()
    }

    fn manifest_mut(&mut self) -> Option<&mut Map> {
        self.document.root_mut().get_mut(MANIFEST_KEY)?.as_object_mut()
    }

    fn node_mut(&mut self, chain: &[String]) -> Option<&mut Map> {
        let (key, parents) = chain.split_last()?;
        container_mut(self.manifest_mut()?, parents)?
            .get_mut(key)?
            .as_object_mut()
    }

    /// Children map of the node at `chain`, created when absent or null.
    fn children_or_create(&mut self, chain: &[String]) -> Option<&mut Map> {
        let node = self.node_mut(chain)?;
        let children = node.entry(CHILDREN_KEY).or_insert(Value::Null);
        if children.is_null() {
            *children = Value::Object(Map::new());
        }
        children.as_object_mut()
    }

    /// True when [`Self::children_or_create`] would succeed for `chain`.
    fn children_writable(&self, chain: &[String]) -> bool {
        match self.document.get_path(&node_path(chain)) {
            Some(Value::Object(node)) => matches!(
                node.get(CHILDREN_KEY),
                None | Some(Value::Null) | Some(Value::Object(_))
            ),
            _ => false,
        }
    }

    /// Whether the node map below `parent` (the top level when empty) has `key`.
    fn key_taken(&self, parent: &[String], key: &str) -> bool {
        let mut path = node_path(parent);
        if !parent.is_empty() {
            path.push(CHILDREN_KEY);
        }
        self.document
            .get_object(&path)
            .is_some_and(|nodes| nodes.contains_key(key))
    }

    fn remove_entry(&mut self, parent: &[String], key: &str) -> Option<Value> {
        container_mut(self.manifest_mut()?, parent)?.shift_remove(key)
    }
}

impl FromStr for Manifest {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document)
    }
}

fn node_key(id: &str) -> String {
    format!("{}{}", KEY_PREFIX, id)
}

/// Depth-first search for `key`, checking each node before its children.
fn locate(nodes: &Map, key: &str) -> Option<Vec<String>> {
    let mut chain = Vec::new();
    locate_into(nodes, key, &mut chain).then_some(chain)
}

fn locate_into(nodes: &Map, key: &str, chain: &mut Vec<String>) -> bool {
    for (entry_key, value) in nodes {
        let Some(node) = value.as_object() else {
            continue;
        };
        chain.push(entry_key.clone());
        if entry_key == key {
            return true;
        }
        if let Some(children) = node.get(CHILDREN_KEY).and_then(Value::as_object) {
            if locate_into(children, key, chain) {
                return true;
            }
        }
        chain.pop();
    }
    false
}

/// Node map reached by walking `parents` down from the top level.
fn container_mut<'a>(top: &'a mut Map, parents: &[String]) -> Option<&'a mut Map> {
    let mut nodes = top;
    for key in parents {
        nodes = nodes
            .get_mut(key)?
            .as_object_mut()?
            .get_mut(CHILDREN_KEY)?
            .as_object_mut()?;
    }
    Some(nodes)
}
