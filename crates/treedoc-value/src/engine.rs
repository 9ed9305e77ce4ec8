//! Path resolution and path creation over a value tree.
//!
//! Reads walk key segments through objects and index segments through
//! arrays; any other pairing aborts the walk. Writes walk the same way but
//! create missing nodes, choosing the container kind from the segment that
//! follows.

use serde_json::Value;

use crate::path::{Segment, APPEND};
use crate::Map;

/// Resolve `path` from `root`.
///
/// Returns `None` when a segment does not fit the node it is applied to,
/// when a key is missing or an index is out of range. A present `null`
/// is returned as `Some(Value::Null)`.
pub fn get_path<'a>(root: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key)?,
            (Value::Array(items), Segment::Index(index)) => items.get(array_slot(*index)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable counterpart of [`get_path`]. Never creates nodes.
pub fn get_path_mut<'a>(root: &'a mut Value, path: &[Segment]) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in path {
        current = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get_mut(key)?,
            (Value::Array(items), Segment::Index(index)) => {
                items.get_mut(array_slot(*index)?)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve `path`, creating whatever is missing along the way.
///
/// A missing final node is filled with `default_leaf`. A missing
/// intermediate node becomes an object when the next segment is a key and
/// an array when it is an index. The [`APPEND`] index always pushes a fresh
/// node onto the array, however many elements it already holds.
///
/// An existing node is returned as found, whatever its kind, even when it
/// differs from `default_leaf`. Refusing a node of the wrong kind is the job
/// of the typed writers (`Document::write_object`, `Document::write_array`);
/// other callers check the kind of the result themselves.
///
/// `None` means the path cannot address this tree (a segment of the wrong
/// kind for its parent, or an index that is neither in range nor the append
/// sentinel) and that nothing was changed at the failing step.
pub fn write_path<'a>(
    root: &'a mut Value,
    path: &[Segment],
    default_leaf: Value,
) -> Option<&'a mut Value> {
    if !path_fits(root, path) {
        return None;
    }

    let mut leaf = Some(default_leaf);
    let mut current = root;
    for (i, segment) in path.iter().enumerate() {
        let next = path.get(i + 1);
        current = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => {
                let slot = map.entry(key.clone()).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = fresh_node(next, &mut leaf);
                }
                slot
            }
            (Value::Array(items), Segment::Index(APPEND)) => {
                items.push(fresh_node(next, &mut leaf));
                items.last_mut()?
            }
            (Value::Array(items), Segment::Index(index)) => {
                let slot = items.get_mut(array_slot(*index)?)?;
                if slot.is_null() {
                    return None;
                }
                slot
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Store `value` at `path`, creating intermediate nodes like [`write_path`].
///
/// An existing scalar at the final position, `null` included, is replaced.
/// An existing object or array is left alone and the write is refused.
pub fn write_value<'a>(root: &'a mut Value, path: &[Segment], value: Value) -> Option<&'a mut Value> {
    let Some((last, parents)) = path.split_last() else {
        return None;
    };

    // Refuse before creating any intermediate node.
    if !path_fits(root, parents) || !leaf_fits(get_path(root, parents), last) {
        return None;
    }

    let parent_default = match last {
        Segment::Key(_) => Value::Object(Map::new()),
        Segment::Index(_) => Value::Array(Vec::new()),
    };
    let parent = write_path(root, parents, parent_default)?;

    match (parent, last) {
        (Value::Object(map), Segment::Key(key)) => {
            map.insert(key.clone(), value);
            map.get_mut(key)
        }
        (Value::Array(items), Segment::Index(APPEND)) => {
            items.push(value);
            items.last_mut()
        }
        (Value::Array(items), Segment::Index(index)) => {
            let slot = items.get_mut(array_slot(*index)?)?;
            *slot = value;
            Some(slot)
        }
        _ => None,
    }
}

/// Dry run of a write: true when every step of `path` can be resolved or
/// created. Nothing is mutated, so a failing write leaves the tree as it was.
fn path_fits(root: &Value, path: &[Segment]) -> bool {
    let mut current = root;
    for (i, segment) in path.iter().enumerate() {
        let child = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key),
            (Value::Array(_), Segment::Index(APPEND)) => None,
            (Value::Array(items), Segment::Index(index)) => match array_slot(*index) {
                Some(slot) => match items.get(slot) {
                    Some(Value::Null) | None => return false,
                    found => found,
                },
                None => return false,
            },
            _ => return false,
        };
        match child {
            Some(Value::Null) | None => return fresh_path_fits(&path[i + 1..]),
            Some(found) => current = found,
        }
    }
    true
}

/// Whether `last` can receive a scalar under `parent` (`None` or `null` when
/// the parent is still to be created). Existing scalars, `null` included,
/// are replaced; existing containers are not.
fn leaf_fits(parent: Option<&Value>, last: &Segment) -> bool {
    let existing = match (parent, last) {
        (None | Some(Value::Null), segment) => {
            return fresh_path_fits(std::slice::from_ref(segment))
        }
        (Some(Value::Object(map)), Segment::Key(key)) => map.get(key),
        (Some(Value::Array(_)), Segment::Index(APPEND)) => return true,
        (Some(Value::Array(items)), Segment::Index(index)) => match array_slot(*index) {
            Some(slot) if slot < items.len() => items.get(slot),
            _ => return false,
        },
        _ => return false,
    };
    !matches!(existing, Some(Value::Object(_)) | Some(Value::Array(_)))
}

/// Below a freshly created node every container starts empty, so the only
/// index that can address it is the append sentinel.
fn fresh_path_fits(rest: &[Segment]) -> bool {
    rest.iter()
        .all(|segment| !matches!(segment, Segment::Index(index) if *index != APPEND))
}

fn fresh_node(next: Option<&Segment>, leaf: &mut Option<Value>) -> Value {
    match next {
        None => leaf.take().unwrap_or(Value::Null),
        Some(Segment::Key(_)) => Value::Object(Map::new()),
        Some(Segment::Index(_)) => Value::Array(Vec::new()),
    }
}

fn array_slot(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}
