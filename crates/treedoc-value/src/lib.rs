//! Treedoc value tree
//!
//! An insertion-ordered JSON tree with a path-addressing language,
//! on-demand node creation during writes, typed scalar getters and a
//! serializer with the escaping rules used by treedoc documents.

pub mod coerce;
pub mod document;
pub mod engine;
pub mod error;
pub mod path;
pub mod serialize;
pub mod substitute;

pub use document::Document;
pub use engine::{get_path, get_path_mut, write_path, write_value};
pub use error::DocumentError;
pub use path::{Path, Segment, APPEND};
pub use serialize::{escape, serialize_value};
pub use substitute::{Properties, PropertySource};

/// Ordered JSON value. Object iteration order is insertion order.
pub use serde_json::Value;

/// Ordered map backing `Value::Object`.
pub type Map = serde_json::Map<String, Value>;
