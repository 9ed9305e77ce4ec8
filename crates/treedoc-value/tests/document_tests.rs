//! Document read/write tests against a sample configuration.

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;
use treedoc_value::{path, Document, Path, Properties, APPEND};

fn fixture() -> Document {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test-config.json");
    Document::from_file(path).unwrap()
}

// =============================================================================
// Typed reads
// =============================================================================

#[test]
fn test_simple_strings() {
    let json = fixture();
    assert_eq!(json.get_string(None, &path!["test"]).as_deref(), Some("testing"));
    assert_eq!(json.get_string(None, &path!["storage", "type"]).as_deref(), Some("fedora3"));
    assert_eq!(
        json.get_string(None, &path!["storage", "config", "uri"]).as_deref(),
        Some("http://localhost:8080/fedora")
    );
    // Genuine boolean read as a string
    assert_eq!(
        json.get_string(None, &path!["indexer", "config", "autocommit"]).as_deref(),
        Some("true")
    );
}

#[test]
fn test_simple_integers() {
    let json = fixture();
    assert_eq!(json.get_integer(None, &path!["portal", "records-per-page"]), Some(10));
    assert_eq!(json.get_integer(None, &path!["portal", "facet-count"]), Some(25));
}

#[test]
fn test_simple_booleans() {
    let json = fixture();
    assert_eq!(json.get_boolean(None, &path!["indexer", "config", "autocommit"]), Some(true));
    assert_eq!(json.get_boolean(None, &path!["portal", "facet-sort-by-count"]), Some(true));
}

#[test]
fn test_default_values() {
    let json = fixture();

    assert_eq!(json.get_boolean(None, &path!["invalid", "path"]), None);
    assert_eq!(json.get_boolean(Some(true), &path!["invalid", "path"]), Some(true));
    assert_eq!(json.get_boolean(Some(false), &path!["invalid", "path"]), Some(false));
    // Integer at a boolean path is a mismatch
    assert_eq!(json.get_boolean(Some(false), &path!["portal", "records-per-page"]), Some(false));
    // Any string other than "true" parses as false
    assert_eq!(json.get_boolean(Some(true), &path!["test"]), Some(false));

    assert_eq!(json.get_integer(Some(10), &path!["invalid", "path"]), Some(10));
    assert_eq!(json.get_integer(Some(10), &path!["test"]), Some(10));

    assert_eq!(json.get_string(None, &path!["invalid", "path"]), None);
    assert_eq!(
        json.get_string(Some("random"), &path!["invalid", "path"]).as_deref(),
        Some("random")
    );
}

#[test]
fn test_null_node_reads_as_absent() {
    let json = fixture();
    assert_eq!(json.get_path(&path!["nullNode"]), Some(&Value::Null));
    assert_eq!(json.get_string(Some("dflt"), &path!["nullNode"]).as_deref(), Some("dflt"));
}

#[test]
fn test_complex_paths() {
    let json = fixture();
    assert_eq!(json.get_string(None, &path!["transformer", "ints", 2]).as_deref(), Some("3"));
    assert_eq!(json.get_integer(None, &path!["transformer", "ints", 2]), Some(3));
    assert_eq!(json.get_string(None, &path!["numbers", 1]).as_deref(), Some("two"));
    assert_eq!(json.get_string(None, &path!["map-list", 0, "name"]).as_deref(), Some("map-one"));
    assert_eq!(json.get_integer(None, &path!["map-list", 0, "sub-list", 2]), Some(3));
    assert_eq!(json.get_string(None, &path!["map-list", 1, "name"]).as_deref(), Some("map-two"));
    assert_eq!(json.get_boolean(Some(false), &path!["map-list", 1, "sub-list", 3]), Some(true));
}

#[test]
fn test_textual_paths() {
    let json = fixture();
    let p = Path::parse("map-list/[1]/sub-list/[3]").unwrap();
    assert_eq!(json.get_boolean(None, &p), Some(true));
}

#[test]
fn test_string_lists() {
    let json = fixture();
    assert_eq!(
        json.get_string_list(&path!["map-list", 0, "sub-list"]),
        Some(vec!["one".to_string(), "two".to_string()])
    );
    assert_eq!(json.get_string_list(&path!["test"]), Some(vec!["testing".to_string()]));
    assert_eq!(json.get_string_list(&path!["portal"]), None);
}

#[test]
fn test_document_list_and_map() {
    let json = fixture();
    let list = json.get_document_list(&path!["map-list"]).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].get_string(None, &path!["sub-list", 2]).as_deref(), Some("3"));
    assert_eq!(list[1].get_boolean(None, &path!["sub-list", 2]), Some(false));

    let map = json.get_document_map(&[]).unwrap();
    assert!(map.iter().all(|(key, _)| key != "comment1"));
    assert!(map.iter().any(|(key, _)| key == "indexer"));
}

#[test]
fn test_search() {
    let json = fixture();
    assert_eq!(json.search("label").len(), 7);

    let sub_lists = json.search("sub-list");
    assert_eq!(sub_lists.len(), 2);
    assert!(sub_lists.iter().all(|v| v.as_array().map(Vec::len) == Some(4)));
}

// =============================================================================
// Writes
// =============================================================================

#[test]
fn test_modify_in_place_through_writable_view() {
    let mut json = fixture();
    json.get_object_mut(&path!["map-list", 0])
        .unwrap()
        .insert("name".into(), json!("map-one-really"));
    assert_eq!(
        json.get_string(None, &path!["map-list", 0, "name"]).as_deref(),
        Some("map-one-really")
    );
}

#[test]
fn test_append_twice_keeps_both() {
    let mut json = fixture();
    json.write_path(&path!["numbers", APPEND], json!("four"));
    json.write_path(&path!["numbers", APPEND], json!("five"));
    assert_eq!(
        json.get_array(&path!["numbers"]).unwrap(),
        &vec![json!("one"), json!("two"), json!("three"), json!("four"), json!("five")]
    );
}

#[test]
fn test_write_refusal_leaves_value() {
    let mut json = fixture();
    assert!(json.write_object(&path!["test"]).is_none());
    assert!(json.write_string(&path!["storage"], "flat").is_none());
    assert_eq!(json.get_string(None, &path!["test"]).as_deref(), Some("testing"));
    assert!(json.get_object(&path!["storage"]).is_some());
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_pretty_round_trip() {
    let json = fixture();
    let reparsed = Document::parse(&json.to_json_string(true)).unwrap();
    assert_eq!(reparsed, json);
    assert_eq!(
        reparsed.get_integer(None, &path!["map-list", 0, "sub-list", 2]),
        json.get_integer(None, &path!["map-list", 0, "sub-list", 2])
    );
    // The null node survives
    assert!(reparsed.root().contains_key("nullNode"));
    assert!(reparsed.root()["nullNode"].is_null());
}

#[test]
fn test_compact_round_trip() {
    let json = fixture();
    assert_eq!(Document::parse(&json.to_json_string(false)).unwrap(), json);
}

#[test]
fn test_escaped_text_round_trip() {
    let mut json = Document::new();
    json.write_string(&path!["quote"], "Some \"quoted\" text with \\ escaped characters\n\u{2001}/");
    let text = json.to_json_string(true);
    let reparsed = Document::parse(&text).unwrap();
    assert_eq!(reparsed, json);
}

#[test]
fn test_write_to_file_and_reload() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out.json");
    let json = fixture();
    json.write_to(fs::File::create(&target).unwrap(), true).unwrap();

    let mut reloaded = Document::from_reader(fs::File::open(&target).unwrap()).unwrap();
    reloaded.set_properties(Properties::empty());
    assert_eq!(reloaded, json);
    let keys: Vec<_> = reloaded.root().keys().cloned().collect();
    let original: Vec<_> = json.root().keys().cloned().collect();
    assert_eq!(keys, original);
}
