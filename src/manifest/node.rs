//! Manifest node snapshots

use treedoc_value::{Document, Path, Segment, Value};

use super::{CHILDREN_KEY, MANIFEST_KEY};

/// Owned view of one manifest node and its descendants.
///
/// `key` and `parent_key` describe where the node sits when the snapshot
/// was taken; they are not stored in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestNode {
    /// Key under which the node is stored in its parent
    pub key: String,

    /// Key of the enclosing node, `None` at the top level
    pub parent_key: Option<String>,

    pub id: Option<String>,
    pub title: Option<String>,
    pub hidden: bool,

    /// Child nodes in display order
    pub children: Vec<ManifestNode>,
}

impl ManifestNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes below this one, at any depth.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Depth-first lookup of `key` in this node and its descendants.
    pub fn find(&self, key: &str) -> Option<&ManifestNode> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}

/// Document path of the node reached through `chain` (top-level key first).
pub(crate) fn node_path(chain: &[String]) -> Path {
    let mut path = Path::default();
    path.push(MANIFEST_KEY);
    for (depth, key) in chain.iter().enumerate() {
        if depth > 0 {
            path.push(CHILDREN_KEY);
        }
        path.push(key.as_str());
    }
    path
}

/// Snapshots of every object entry of the node map at `map_path`.
pub(crate) fn read_nodes(
    document: &Document,
    map_path: &[Segment],
    parent_key: Option<&str>,
) -> Vec<ManifestNode> {
    let Some(map) = document.get_object(map_path) else {
        return Vec::new();
    };

    map.iter()
        .filter(|(_, value)| value.is_object())
        .map(|(key, _)| {
            let mut path: Path = map_path.iter().cloned().collect();
            path.push(key.as_str());
            read_node(document, path, key, parent_key)
        })
        .collect()
}

pub(crate) fn read_node(document: &Document, mut path: Path, key: &str, parent_key: Option<&str>) -> ManifestNode {
    path.push("id");
    let id = document.get_string(None, &path);
    path.pop();

    path.push("title");
    let title = document.get_string(None, &path);
    path.pop();

    path.push("hidden");
    let hidden = document.get_boolean(Some(false), &path).unwrap_or(false);
    path.pop();

    path.push(CHILDREN_KEY);
    let children = read_nodes(document, &path, Some(key));

    ManifestNode {
        key: key.to_string(),
        parent_key: parent_key.map(str::to_string),
        id,
        title,
        hidden,
        children,
    }
}

/// Fresh node object holding `id` and `title`.
pub(crate) fn new_node(id: &str, title: &str) -> Value {
    let mut map = treedoc_value::Map::new();
    map.insert("id".to_string(), Value::String(id.to_string()));
    map.insert("title".to_string(), Value::String(title.to_string()));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_path_interleaves_children() {
        let chain = vec!["node-a".to_string(), "node-b".to_string()];
        assert_eq!(
            node_path(&chain).to_string(),
            "manifest/node-a/children/node-b"
        );
        assert_eq!(node_path(&[]).to_string(), "manifest");
    }

    #[test]
    fn test_read_nodes_skips_non_objects() {
        let document = Document::parse(
            r#"{"manifest": {
                "node-1": {"id": "1", "title": "One", "hidden": "TRUE",
                           "children": {"node-2": {"id": "2", "title": "Two"}}},
                "stray": "text"
            }}"#,
        )
        .unwrap();

        let nodes = read_nodes(&document, &node_path(&[]), None);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].hidden);
        assert_eq!(nodes[0].descendant_count(), 1);

        let child = nodes[0].find("node-2").unwrap();
        assert_eq!(child.parent_key.as_deref(), Some("node-1"));
        assert_eq!(child.title.as_deref(), Some("Two"));
        assert!(!child.has_children());
    }
}
