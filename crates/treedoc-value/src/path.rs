//! Path segments used to address nodes in a document.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Index sentinel meaning "append a new element here".
///
/// Only meaningful when writing. A read through this index finds nothing.
pub const APPEND: i64 = -1;

/// One step of a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(i64),
}

impl Segment {
    /// True for the append sentinel.
    pub fn is_append(&self) -> bool {
        matches!(self, Segment::Index(APPEND))
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<i64> for Segment {
    fn from(index: i64) -> Self {
        Segment::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Build a segment array from keys and indices.
///
/// ```
/// use treedoc_value::{path, Segment};
/// let p = path!["map-list", 0, "name"];
/// assert_eq!(p[1], Segment::Index(0));
/// ```
#[macro_export]
macro_rules! path {
    ($($segment:expr),* $(,)?) => {
        [$($crate::Segment::from($segment)),*]
    };
}

/// An owned path, parsed from text such as `storage/config/uri` or `map-list/[0]/name`.
///
/// Segments are separated by `/`. A segment written as `[n]` is an array index;
/// anything else is an object key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Parse a textual path. Empty segments are ignored.
    pub fn parse(text: &str) -> Result<Self, PathParseError> {
        let mut segments = Vec::new();
        for part in text.split('/').filter(|part| !part.is_empty()) {
            match part.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
                Some(index) => {
                    let index = index
                        .parse::<i64>()
                        .map_err(|_| PathParseError::BadIndex(part.to_string()))?;
                    if index < APPEND {
                        return Err(PathParseError::BadIndex(part.to_string()));
                    }
                    segments.push(Segment::Index(index));
                }
                None => segments.push(Segment::Key(part.to_string())),
            }
        }
        Ok(Self(segments))
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.0.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    pub fn into_inner(self) -> Vec<Segment> {
        self.0
    }
}

impl Deref for Path {
    type Target = [Segment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// Errors from [`Path::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathParseError {
    #[error("Invalid index segment: {0}")]
    BadIndex(String),
}
