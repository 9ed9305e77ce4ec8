//! `${name}` placeholder substitution for string reads.

use regex_lite::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Where placeholder values come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
    /// Fixed key/value pairs.
    Map(BTreeMap<String, String>),
    /// Process environment variables.
    Environment,
}

impl PropertySource {
    fn lookup(&self, name: &str) -> Option<String> {
        match self {
            PropertySource::Map(map) => map.get(name).cloned(),
            PropertySource::Environment => std::env::var(name).ok(),
        }
    }
}

/// Ordered list of property sources. The first source defining a name wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    sources: Vec<PropertySource>,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            sources: vec![PropertySource::Environment],
        }
    }
}

impl Properties {
    pub fn new(sources: Vec<PropertySource>) -> Self {
        Self { sources }
    }

    /// No sources at all: every placeholder stays verbatim.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Define `name` ahead of every existing source.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match self.sources.first_mut() {
            Some(PropertySource::Map(map)) => {
                map.insert(name.into(), value.into());
            }
            _ => {
                let mut map = BTreeMap::new();
                map.insert(name.into(), value.into());
                self.sources.insert(0, PropertySource::Map(map));
            }
        }
        self
    }

    pub fn sources(&self) -> &[PropertySource] {
        &self.sources
    }

    pub fn lookup(&self, name: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.lookup(name))
    }

    /// Replace every resolvable `${name}` in `text`.
    ///
    /// Unknown names are left as written. `$${name}` yields a literal `${name}`.
    pub fn substitute(&self, text: &str) -> String {
        if !text.contains("${") {
            return text.to_string();
        }
        placeholder()
            .replace_all(text, |caps: &Captures<'_>| {
                let name = &caps[2];
                if caps.get(1).is_some() {
                    return format!("${{{}}}", name);
                }
                self.lookup(name).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$(\$)?\{([^{}]*)\}").expect("placeholder pattern is valid"))
}
