//! Locations inside a JSON document or a schema document.
//!
//! A [`FieldPath`] is built from the inside out: a field reports a violation
//! with an empty path, and every enclosing layer (schema, array, object)
//! prefixes its own segment while merging the child's errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object key, rendered as `.key` (or `key` at the start of a path).
    Key(String),
    /// Array position, rendered as `[i]`.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Ordered list of segments from the document root.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::{FieldPath, PathSegment};
///
/// let mut path = FieldPath::root();
/// path.prepend(PathSegment::Key("city".into()));
/// path.prepend(PathSegment::Index(2));
/// path.prepend(PathSegment::Key("addresses".into()));
/// assert_eq!(path.to_string(), "addresses[2].city");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path (the value under validation itself).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Inserts `segment` as the new outermost step.
    pub fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }

    /// Returns `true` for the empty path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
