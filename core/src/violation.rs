//! Validation violations and the aggregator every validate path threads
//! through.
//!
//! Validation never stops at the first failure. Each layer collects its own
//! findings into a [`Violations`] list and merges child lists with
//! [`Violations::absorb`], which prefixes the child's paths with the layer's
//! own segment (field name or array index).

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::kind::FieldKind;
use crate::path::{FieldPath, PathSegment};

/// A numeric limit as configured on an integer or float field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bound {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(n) => write!(f, "{n}"),
            Bound::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<i64> for Bound {
    fn from(n: i64) -> Self {
        Bound::Int(n)
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Bound::Float(n)
    }
}

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field was absent or null.
    #[error("value is required")]
    Required,
    /// The JSON type does not match the field kind.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: FieldKind,
        found: &'static str,
    },
    #[error("value should be positive")]
    NotPositive,
    #[error("value should be negative")]
    NotNegative,
    #[error("value should be at least {0}")]
    BelowMinimum(Bound),
    #[error("value should be at most {0}")]
    AboveMaximum(Bound),
    /// The value falls outside every configured range.
    #[error("value should be in one of these ranges: {}", render_ranges(.0))]
    OutOfRanges(Vec<(Bound, Bound)>),
    #[error("value should have at least {min} characters")]
    TooFewCharacters { min: usize },
    #[error("value should have at most {max} characters")]
    TooManyCharacters { max: usize },
    #[error("value does not match format {pattern}")]
    FormatMismatch { pattern: String },
    #[error("value should be one of: [{}]", .choices.join(", "))]
    NotAChoice { choices: Vec<String> },
    #[error("value should be {expected}")]
    UnexpectedBoolean { expected: bool },
    #[error("value should be null")]
    NotNull,
    #[error("array should have at least {min} items")]
    TooFewItems { min: usize },
    #[error("array should have at most {max} items")]
    TooManyItems { max: usize },
    /// A fixed-item array has the wrong number of elements.
    #[error("array should have exactly {expected} items, found {found}")]
    FixedLengthMismatch { expected: usize, found: usize },
    /// An object field received JSON text that does not parse.
    #[error("value is not valid JSON: {reason}")]
    InvalidJson { reason: String },
    /// Strict mode: the key is not declared by any field.
    #[error("unknown field")]
    UnknownField,
}

fn render_ranges(ranges: &[(Bound, Bound)]) -> String {
    ranges
        .iter()
        .map(|(start, end)| format!("[{start}, {end}]"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One validation failure: where it happened, which field reported it, and
/// why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Location from the root of the validated document.
    pub path: FieldPath,
    /// Name of the field that reported the failure.
    pub field: String,
    /// The reason.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: FieldPath::root(),
            field: field.into(),
            kind,
        }
    }

    /// Human-readable location: the path, or the field name for a violation
    /// reported directly by a field.
    pub fn location(&self) -> String {
        if self.path.is_root() {
            self.field.clone()
        } else {
            self.path.to_string()
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.kind)
    }
}

/// Ordered collection of every violation found in one validate call.
///
/// An empty collection means the value is valid.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::{Violations, ViolationKind, PathSegment};
///
/// let mut inner = Violations::new();
/// inner.push("age", ViolationKind::Required);
///
/// let mut outer = Violations::new();
/// outer.absorb(PathSegment::Key("person".into()), inner);
/// assert_eq!(outer.len(), 1);
/// assert_eq!(outer.to_string(), "person: value is required");
/// assert!(outer.into_result().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Error, Serialize)]
#[error("{}", render_lines(.0))]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

fn render_lines(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl Violations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Collection holding a single violation.
    pub fn single(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self(vec![Violation::new(field, kind)])
    }

    /// Records a violation reported by `field` at the current level.
    pub fn push(&mut self, field: impl Into<String>, kind: ViolationKind) {
        self.0.push(Violation::new(field, kind));
    }

    /// Merges `child` into `self`, prefixing each child path with `segment`.
    pub fn absorb(&mut self, segment: PathSegment, child: Violations) {
        self.0.extend(child.0.into_iter().map(|mut violation| {
            violation.path.prepend(segment.clone());
            violation
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Returns the underlying list.
    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Extend<Violation> for Violations {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
