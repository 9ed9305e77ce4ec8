//! Scalar coercion rules for typed reads.
//!
//! Each function receives the node found at a path (or `None`) plus the
//! caller's default. Absent and `null` nodes yield the default. A scalar of
//! an incompatible kind logs a warning and yields the default. Containers
//! where a scalar was expected yield `None`.

use serde_json::Value;
use tracing::warn;

use crate::error::kind_name;

/// Integer read: native integers and parseable numeric strings.
pub fn to_integer(node: Option<&Value>, default: Option<i64>) -> Option<i64> {
    match node {
        None | Some(Value::Null) => default,
        Some(Value::Number(number)) => match number.as_i64() {
            Some(int) => Some(int),
            None => {
                warn!(value = %number, "Integer requested, found a non-integral number");
                default
            }
        },
        Some(Value::String(text)) => match text.parse::<i64>() {
            Ok(int) => Some(int),
            Err(_) => {
                warn!(value = %text, "Integer requested, string is not a parsable integer");
                default
            }
        },
        Some(Value::Bool(_)) => {
            warn!("Integer requested, found a boolean");
            default
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => None,
    }
}

/// Boolean read: native booleans, or a string equal to `true` ignoring case.
///
/// Any other string is `false`. Numbers are a mismatch.
pub fn to_boolean(node: Option<&Value>, default: Option<bool>) -> Option<bool> {
    match node {
        None | Some(Value::Null) => default,
        Some(Value::Bool(flag)) => Some(*flag),
        Some(Value::String(text)) => Some(text.eq_ignore_ascii_case("true")),
        Some(Value::Number(_)) => {
            warn!("Boolean requested, found a number");
            default
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => None,
    }
}

/// String read: strings, numbers and booleans in their text form.
///
/// A single-element array holding a string collapses to that string. Any
/// other array is ambiguous and yields `None`, not the default.
pub fn to_string(node: Option<&Value>, default: Option<&str>) -> Option<String> {
    match node {
        None | Some(Value::Null) => default.map(str::to_string),
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        Some(Value::Array(items)) => match items.as_slice() {
            [Value::String(only)] => Some(only.clone()),
            _ => {
                warn!(len = items.len(), "Unable to convert array to a single string");
                None
            }
        },
        Some(Value::Object(_)) => None,
    }
}

/// String-list read: the string elements of an array, or a lone string.
///
/// Non-string array elements are skipped.
pub fn to_string_list(node: Option<&Value>) -> Option<Vec<String>> {
    match node? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        Value::String(text) => Some(vec![text.clone()]),
        other => {
            tracing::debug!(kind = kind_name(other), "String list requested on a non-list node");
            None
        }
    }
}
