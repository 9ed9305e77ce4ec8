//! Error types for document construction.

use std::io;

/// Errors raised while building a [`crate::Document`] from text.
///
/// Path reads and writes never fail with an error; they return `None`.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The text parsed, but no object could be promoted to the document root.
    #[error("Expected a JSON object or an array holding one, found {found}")]
    NotAnObject { found: &'static str },
}

/// Short name of a value's kind, used in errors and log lines.
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
