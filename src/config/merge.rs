//! Fragment merge logic
//!
//! Merges a parsed fragment into a target object:
//! - Missing keys: inserted
//! - Objects: deep-merge by key
//! - Arrays: CONCATENATE (incoming appended after existing)
//! - Scalars and mixed kinds: override (incoming wins)

use treedoc_value::{Map, Value};

/// Merge `incoming` into `target` in place.
///
/// Array elements are never merged individually; an incoming array is
/// appended as a whole. New keys land after the target's existing keys,
/// replaced keys keep their position.
pub fn merge_fragment(target: &mut Map, incoming: Map) {
    for (key, incoming_value) in incoming {
        match (target.get_mut(&key), incoming_value) {
            // Both objects: deep merge
            (Some(Value::Object(existing)), Value::Object(fragment)) => {
                merge_fragment(existing, fragment);
            }

            // Both arrays: append
            (Some(Value::Array(existing)), Value::Array(items)) => {
                existing.extend(items);
            }

            // Scalars and any other case: incoming wins
            (Some(slot), value) => *slot = value,

            (None, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Merge several fragments in order; the last fragment wins for scalars.
pub fn merge_all(target: &mut Map, fragments: impl IntoIterator<Item = Map>) {
    for fragment in fragments {
        merge_fragment(target, fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map {
        match value {
            Value::Object(map) => map,
            _ => panic!("test value must be an object"),
        }
    }

    fn merged(target: Value, incoming: Value) -> Value {
        let mut target = object(target);
        merge_fragment(&mut target, object(incoming));
        Value::Object(target)
    }

    #[test]
    fn test_scalar_override_array_append() {
        let result = merged(json!({"a": 1, "b": [1, 2]}), json!({"a": 2, "b": [3]}));
        assert_eq!(result, json!({"a": 2, "b": [1, 2, 3]}));
    }

    #[test]
    fn test_nested_storage_settings_merge_by_key() {
        let result = merged(
            json!({"storage": {"type": "file-system", "file-system": {"home": "/srv/data"}}}),
            json!({"storage": {"type": "object-store", "object-store": {"bucket": "records"}}}),
        );

        assert_eq!(
            result,
            json!({"storage": {
                "type": "object-store",
                "file-system": {"home": "/srv/data"},
                "object-store": {"bucket": "records"}
            }})
        );
    }

    #[test]
    fn test_add_new_key_after_existing() {
        let result = merged(json!({"b": 1, "a": 1}), json!({"c": 2, "a": 3}));
        let keys: Vec<_> = result.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(result["a"], 3);
    }

    #[test]
    fn test_mixed_kinds_are_replaced() {
        let result = merged(
            json!({"list": [1], "obj": {"x": 1}, "text": "t"}),
            json!({"list": {"now": "object"}, "obj": [1], "text": ["t"]}),
        );
        assert_eq!(
            result,
            json!({"list": {"now": "object"}, "obj": [1], "text": ["t"]})
        );
    }

    #[test]
    fn test_null_target_is_filled() {
        let result = merged(json!({"value": null}), json!({"value": {"a": 1}}));
        assert_eq!(result["value"], json!({"a": 1}));
    }

    #[test]
    fn test_null_fragment_value_clears_setting() {
        let result = merged(
            json!({"portal": {"records-per-page": 10}}),
            json!({"portal": {"records-per-page": null}}),
        );
        assert!(result["portal"]["records-per-page"].is_null());
    }

    #[test]
    fn test_nested_array_of_objects_is_appended_not_merged() {
        let result = merged(
            json!({"plugins": [{"id": "a", "on": true}]}),
            json!({"plugins": [{"id": "a", "on": false}]}),
        );
        assert_eq!(
            result["plugins"],
            json!([{"id": "a", "on": true}, {"id": "a", "on": false}])
        );
    }

    #[test]
    fn test_merge_all_applies_fragments_in_order() {
        let mut target = object(json!({
            "indexer": {"threads": 4, "facets": ["type"]},
            "portal": {"default-view": "default"}
        }));
        merge_all(
            &mut target,
            vec![
                object(json!({"indexer": {"threads": 8, "facets": ["year"]}})),
                object(json!({"portal": {"default-view": "compact"}})),
                object(json!({"indexer": {"threads": 2}})),
            ],
        );
        let result = Value::Object(target);

        assert_eq!(result["indexer"]["threads"], 2);
        assert_eq!(result["indexer"]["facets"], json!(["type", "year"]));
        assert_eq!(result["portal"]["default-view"], "compact");
    }
}
