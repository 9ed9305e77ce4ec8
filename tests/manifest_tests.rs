//! Integration tests for manifest reading and reordering

mod fixtures;

use fixtures::manifest_path;
use std::fs;
use tempfile::TempDir;
use treedoc::{path, Manifest, ManifestNode};

fn keys(nodes: &[ManifestNode]) -> Vec<&str> {
    nodes.iter().map(|node| node.key.as_str()).collect()
}

fn titles(nodes: &[ManifestNode]) -> Vec<&str> {
    nodes
        .iter()
        .map(|node| node.title.as_deref().unwrap_or_default())
        .collect()
}

fn load() -> Manifest {
    Manifest::from_file(manifest_path()).unwrap()
}

#[test]
fn test_reading_fixture() {
    let manifest = load();

    assert_eq!(manifest.title().as_deref(), Some("Field survey 2019"));
    assert_eq!(manifest.description().as_deref(), Some(""));
    assert_eq!(manifest.package_type().as_deref(), Some("default"));
    assert_eq!(manifest.view_id().as_deref(), Some("default"));

    assert_eq!(manifest.size(), 8);
    let top = manifest.top_nodes();
    assert_eq!(keys(&top), vec!["node-a1", "node-b2", "node-e5", "node-h8"]);
    assert!(top.iter().all(|node| node.parent_key.is_none()));

    let photos = &top[1].children;
    assert_eq!(titles(photos), vec!["north-ridge.jpg", "south-ridge.jpg"]);
    assert!(photos[1].hidden);
    assert!(!photos[0].hidden);

    let node = manifest.get_node("node-d4").unwrap();
    assert_eq!(node.title.as_deref(), Some("south-ridge.jpg"));
    assert_eq!(node.parent_key.as_deref(), Some("node-b2"));

    let basic_read = manifest.document().get_string(
        None,
        &path!["manifest", "node-b2", "children", "node-d4", "title"],
    );
    assert_eq!(basic_read.as_deref(), Some("south-ridge.jpg"));
}

#[test]
fn test_movement_sequence() {
    let mut manifest = load();

    // Into another node's children, appended at the end
    assert!(manifest.move_into("node-h8", Some("node-b2")));
    assert_eq!(manifest.size(), 8);
    assert_eq!(
        keys(&manifest.top_nodes()),
        vec!["node-a1", "node-b2", "node-e5"]
    );
    let photos = manifest.children("node-b2").unwrap();
    assert_eq!(keys(&photos), vec!["node-c3", "node-d4", "node-h8"]);
    assert_eq!(photos[2].title.as_deref(), Some("FinalReport.pdf"));

    // After a node under a different parent
    assert!(manifest.move_after("node-a1", "node-c3"));
    assert_eq!(manifest.size(), 8);
    assert_eq!(keys(&manifest.top_nodes()), vec!["node-b2", "node-e5"]);
    let photos = manifest.children("node-b2").unwrap();
    assert_eq!(
        keys(&photos),
        vec!["node-c3", "node-a1", "node-d4", "node-h8"]
    );
    assert_eq!(photos[1].parent_key.as_deref(), Some("node-b2"));

    // Before a sibling
    assert!(manifest.move_before("node-h8", "node-a1"));
    let photos = manifest.children("node-b2").unwrap();
    assert_eq!(
        keys(&photos),
        vec!["node-c3", "node-h8", "node-a1", "node-d4"]
    );

    // A whole subtree into a leaf
    assert!(!manifest.get_node("node-d4").unwrap().has_children());
    assert!(manifest.move_into("node-e5", Some("node-d4")));
    assert_eq!(manifest.size(), 8);
    assert_eq!(keys(&manifest.top_nodes()), vec!["node-b2"]);

    let leaf = manifest.get_node("node-d4").unwrap();
    assert_eq!(keys(&leaf.children), vec!["node-e5"]);
    assert_eq!(leaf.children[0].children[0].title.as_deref(), Some("raw-data.xls"));

    let deepest = manifest.get_node("g7").unwrap();
    assert_eq!(deepest.parent_key.as_deref(), Some("node-f6"));
    assert_eq!(deepest.title.as_deref(), Some("calibration.txt"));
}

#[test]
fn test_move_before_on_fresh_manifest() {
    let mut manifest = Manifest::new();
    assert!(manifest.add_top_node("1", "A"));
    assert!(manifest.add_top_node("2", "B"));
    assert!(manifest.move_before("2", "node-1"));

    assert_eq!(keys(&manifest.top_nodes()), vec!["node-2", "node-1"]);
}

#[test]
fn test_refused_moves_leave_manifest_untouched() {
    let mut manifest = load();
    let before = manifest.to_json_string(false);

    assert!(!manifest.move_into("node-e5", Some("node-g7")));
    assert!(!manifest.move_after("node-b2", "node-c3"));
    assert!(!manifest.move_before("node-x9", "node-a1"));
    assert!(!manifest.move_into("node-a1", Some("node-x9")));
    assert!(!manifest.delete("node-x9"));

    assert_eq!(manifest.to_json_string(false), before);
}

#[test]
fn test_delete_removes_subtree() {
    let mut manifest = load();
    assert!(manifest.delete("f6"));

    assert_eq!(manifest.size(), 6);
    assert!(manifest.get_node("node-g7").is_none());
    let measurements = manifest.get_node("node-e5").unwrap();
    assert!(!measurements.has_children());
}

#[test]
fn test_edits_survive_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("manifest.json");

    let mut manifest = load();
    assert!(manifest.add_child("node-e5", "i9", "notes.md"));
    assert!(manifest.set_node_hidden("node-a1", true));
    assert!(manifest.move_before("node-h8", "node-a1"));
    manifest.set_description("Photos and measurements");
    fs::write(&file, manifest.to_json_string(true)).unwrap();

    let reloaded = Manifest::from_file(&file).unwrap();
    assert_eq!(reloaded, manifest);
    assert_eq!(
        keys(&reloaded.top_nodes()),
        vec!["node-h8", "node-a1", "node-b2", "node-e5"]
    );
    assert!(reloaded.get_node("a1").unwrap().hidden);
    assert_eq!(
        keys(&reloaded.children("e5").unwrap()),
        vec!["node-f6", "node-i9"]
    );
    assert_eq!(
        reloaded.description().as_deref(),
        Some("Photos and measurements")
    );
}
