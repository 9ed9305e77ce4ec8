//! Text encoding for documents.
//!
//! Compact output has no whitespace between tokens. Pretty output puts
//! one entry per line, indented by [`INDENT`] per nesting level.

use serde_json::Value;
use std::fmt::Write as _;

/// Indent unit for pretty output.
pub const INDENT: &str = "    ";

/// Escape a string for inclusion between JSON quotes.
///
/// Besides the quote, backslash and the short whitespace escapes, `/` is
/// escaped, and code points in U+0000-U+001F, U+007F-U+009F and
/// U+2000-U+20FF are written as `\uXXXX`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '/' => out.push_str("\\/"),
            '\u{00}'..='\u{1F}' | '\u{7F}'..='\u{9F}' | '\u{2000}'..='\u{20FF}' => {
                let _ = write!(out, "\\u{:04X}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
}

/// Encode a value as text.
pub fn serialize_value(value: &Value, pretty: bool) -> String {
    let mut out = String::new();
    if pretty {
        write_pretty(value, 0, &mut out);
    } else {
        write_compact(value, &mut out);
    }
    out
}

fn write_string(text: &str, out: &mut String) {
    out.push('"');
    escape_into(text, out);
    out.push('"');
}

fn write_compact(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_compact(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_compact(item, out);
            }
            out.push('}');
        }
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => {
            let _ = write!(out, "{}", number);
        }
        Value::String(text) => write_string(text, out),
    }
}

fn write_pretty(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(depth + 1, out);
                write_pretty(item, depth + 1, out);
            }
            out.push('\n');
            indent(depth, out);
            out.push(']');
        }
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(depth + 1, out);
                write_string(key, out);
                out.push_str(": ");
                write_pretty(item, depth + 1, out);
            }
            out.push('\n');
            indent(depth, out);
            out.push('}');
        }
        scalar => write_compact(scalar, out),
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_standard_characters() {
        assert_eq!(escape(r#"a"b\c/d"#), r#"a\"b\\c\/d"#);
        assert_eq!(escape("\n\r\t\u{08}\u{0C}"), r"\n\r\t\b\f");
    }

    #[test]
    fn test_escape_control_ranges() {
        assert_eq!(escape("\u{01}"), r"\u0001");
        assert_eq!(escape("\u{7F}\u{9F}"), r"\u007F\u009F");
        assert_eq!(escape("\u{2028}\u{20AC}"), r"\u2028\u20AC");
        assert_eq!(escape("\u{A0}é"), "\u{A0}é");
    }

    #[test]
    fn test_compact_has_no_whitespace() {
        let value = json!({"b": 1, "a": [true, null, "x"], "c": {}});
        assert_eq!(
            serialize_value(&value, false),
            r#"{"b":1,"a":[true,null,"x"],"c":{}}"#
        );
    }

    #[test]
    fn test_pretty_layout() {
        let value = json!({"name": "x", "list": [1, 2], "empty": []});
        let expected = "{\n    \"name\": \"x\",\n    \"list\": [\n        1,\n        2\n    ],\n    \"empty\": []\n}";
        assert_eq!(serialize_value(&value, true), expected);
    }

    #[test]
    fn test_pretty_escapes_quotes_and_backslashes() {
        let value = json!({"quote": "Some \"quoted\" text with \\ escaped characters"});
        let text = serialize_value(&value, true);
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let text = r#"{"z":1,"a":{"y":[1.5,-2," "],"b":null}}"#;
        let value: Value = serde_json::from_str(text).unwrap();
        let compact = serialize_value(&value, false);
        let reparsed: Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(reparsed, value);
        let keys: Vec<_> = reparsed.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
