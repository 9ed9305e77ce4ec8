//! Treedoc - hierarchical JSON documents
//!
//! Builds on the `treedoc-value` tree with the two layers applications
//! consume directly:
//! - `config`: instance configuration falling back to the system
//!   configuration, with include-directory fragment merging
//! - `manifest`: an ordered, reorderable tree of identified nodes

pub mod config;
pub mod manifest;

pub use config::{ConfigError, ConfigOverlay, FragmentSource, HomeConfig};
pub use manifest::{Manifest, ManifestNode};
pub use treedoc_value::{path, Document, DocumentError, Map, Path, Segment, Value, APPEND};
