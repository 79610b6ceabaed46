//! Schema: an ordered list of fields validating one JSON object level.

use std::path::Path;
use std::str::FromStr;

use serde_json::Value;

use crate::compile::compile_schema;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::path::PathSegment;
use crate::violation::{ViolationKind, Violations};

static ABSENT: Value = Value::Null;

/// Ordered fields plus the strict (closed-world) flag.
///
/// Field names need not be unique; fields sharing a name are each evaluated
/// against the same value.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::{IntegerField, Schema, StringField};
///
/// let schema = Schema::new(vec![
///     StringField::new("name").required().into(),
///     IntegerField::new("age").min(0).into(),
/// ]);
///
/// assert!(schema.validate_str(r#"{"name": "James", "age": 30}"#).is_ok());
///
/// let err = schema.validate_str(r#"{"age": -1}"#).unwrap_err();
/// assert_eq!(err.violations().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
    strict: bool,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            strict: false,
        }
    }

    /// Rejects object keys that no field declares.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Appends a field.
    pub fn with_field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns the first field named `name`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Validates a decoded JSON value, returning every violation.
    ///
    /// In strict mode an object with undeclared keys is reported on those
    /// keys alone; per-field checks are skipped for that pass. Strict mode
    /// has no effect on non-object values.
    pub fn validate(&self, value: &Value) -> Violations {
        let mut violations = Violations::new();

        if self.strict {
            if let Value::Object(map) = value {
                for key in map.keys() {
                    if self.field(key).is_none() {
                        violations.absorb(
                            PathSegment::Key(key.clone()),
                            Violations::single(key, ViolationKind::UnknownField),
                        );
                    }
                }
                if !violations.is_empty() {
                    return violations;
                }
            }
        }

        for field in &self.fields {
            let name = field.name();
            let found = value.get(name).unwrap_or(&ABSENT);
            violations.absorb(PathSegment::Key(name.to_string()), field.validate(found));
        }

        violations
    }

    /// Validates a decoded value, folding violations into [`Error::Invalid`].
    pub fn validate_value(&self, value: &Value) -> Result<()> {
        self.validate(value).into_result().map_err(Error::Invalid)
    }

    /// Parses `input` as JSON and validates it.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] when `input` is not valid JSON (no field runs), or
    /// [`Error::Invalid`] with every violation.
    pub fn validate_str(&self, input: &str) -> Result<()> {
        let value: Value = serde_json::from_str(input)?;
        self.validate_value(&value)
    }

    /// Byte-slice variant of [`validate_str`](Self::validate_str).
    pub fn validate_slice(&self, input: &[u8]) -> Result<()> {
        let value: Value = serde_json::from_slice(input)?;
        self.validate_value(&value)
    }

    /// Compiles a schema document already decoded into a [`Value`].
    pub fn from_value(document: &Value) -> Result<Self> {
        Ok(compile_schema(document)?)
    }

    /// Parses and compiles a schema document from bytes.
    pub fn from_slice(input: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(input)?;
        Self::from_value(&document)
    }

    /// Reads and compiles a schema document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&input)
    }
}

impl FromStr for Schema {
    type Err = Error;

    /// Parses and compiles a schema document.
    fn from_str(input: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(input)?;
        Self::from_value(&document)
    }
}
