//! Schema documents to live field trees.
//!
//! The compiler dispatches on each field's `type` key once, at load time.
//! Structural problems are collected across the whole document, including
//! nested `items`, `fix_items` and `schema` documents, and returned together;
//! a schema either compiles completely or not at all.
//!
//! A constraint is enabled only when its key is present: `"min": 0` is an
//! active lower bound, an absent `min` is no bound.
//!
//! ```text
//! Schema    := { "strict"?: bool, "fields": [FieldSpec, ...] }
//! FieldSpec := { "name": string, "type": kind, "required"?: bool, ... }
//! ```

use std::fmt;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::field::{
    ArrayField, BooleanField, Field, FloatField, IntegerField, Numeric, NumericRange,
    NumericRules, NullField, ObjectField, Sign, StringField, as_whole_number,
};
use crate::kind::{FieldKind, json_type_name};
use crate::path::{FieldPath, PathSegment};
use crate::schema::Schema;

/// What is wrong with a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecErrorKind {
    #[error("schema document must be an object, found {0}")]
    DocumentNotObject(&'static str),
    #[error("\"fields\" must be an array")]
    FieldsNotArray,
    #[error("field spec must be an object, found {0}")]
    FieldNotObject(&'static str),
    #[error("\"type\" key is missing")]
    MissingType,
    #[error("\"type\" must be a string")]
    TypeNotString,
    #[error("invalid type: {0}")]
    UnknownType(String),
    #[error("\"name\" must be a non-empty string")]
    MissingName,
    #[error("\"{key}\" must be {expected}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
    #[error("array field needs either \"items\" or a non-empty \"fix_items\"")]
    MissingItems,
    #[error("array field cannot use both \"items\" and \"fix_items\"")]
    ConflictingItems,
    #[error("\"schema\" key is missing for object field")]
    MissingSchema,
    #[error("invalid format pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// One compile error and where in the document it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecError {
    pub path: FieldPath,
    pub kind: SpecErrorKind,
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// Every compile error found in a schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", render_lines(.0))]
pub struct SpecErrors(Vec<SpecError>);

fn render_lines(errors: &[SpecError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl SpecErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    fn single(kind: SpecErrorKind) -> Self {
        let mut errors = Self::new();
        errors.push(kind);
        errors
    }

    pub fn push(&mut self, kind: SpecErrorKind) {
        self.0.push(SpecError {
            path: FieldPath::root(),
            kind,
        });
    }

    /// Merges `child`, prefixing each path with `segment`.
    pub fn absorb(&mut self, segment: PathSegment, child: SpecErrors) {
        self.0.extend(child.0.into_iter().map(|mut error| {
            error.path.prepend(segment.clone());
            error
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpecError> {
        self.0.iter()
    }
}

impl IntoIterator for SpecErrors {
    type Item = SpecError;
    type IntoIter = std::vec::IntoIter<SpecError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Compiles a schema document into a [`Schema`].
///
/// # Errors
///
/// Returns every structural problem found in the document.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::compile_schema;
/// use serde_json::json;
///
/// let schema = compile_schema(&json!({
///     "fields": [{"name": "name", "type": "string", "required": true}]
/// }))
/// .unwrap();
/// assert!(schema.validate(&json!({"name": "James"})).is_empty());
///
/// let errors = compile_schema(&json!({
///     "fields": [{"name": "a", "type": "decimal"}, {"type": "integer"}]
/// }))
/// .unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub fn compile_schema(document: &Value) -> Result<Schema, SpecErrors> {
    match schema_from(document) {
        Ok(schema) => {
            debug!(
                fields = schema.fields().len(),
                strict = schema.is_strict(),
                "Compiled schema"
            );
            Ok(schema)
        }
        Err(errors) => {
            debug!(errors = errors.len(), "Schema compilation failed");
            Err(errors)
        }
    }
}

/// Compiles a single field spec.
pub fn compile_field(spec: &Value) -> Result<Field, SpecErrors> {
    let Some(map) = spec.as_object() else {
        return Err(SpecErrors::single(SpecErrorKind::FieldNotObject(
            json_type_name(spec),
        )));
    };

    let mut reader = SpecReader::new(map);
    let kind = reader.kind();
    let name = reader.name().unwrap_or_default();
    let required = reader.required();
    let Some(kind) = kind else {
        return Err(reader.errors);
    };

    let field: Option<Field> = match kind {
        FieldKind::Integer => Some(integer_field(name, required, &mut reader).into()),
        FieldKind::Float => Some(float_field(name, required, &mut reader).into()),
        FieldKind::String => Some(string_field(name, required, &mut reader).into()),
        FieldKind::Boolean => Some(boolean_field(name, required, &mut reader).into()),
        FieldKind::Null => Some(NullField::new(name).into()),
        FieldKind::Array => array_field(name, required, &mut reader).map(Field::from),
        FieldKind::Object => object_field(name, required, &mut reader).map(Field::from),
    };

    match field {
        Some(field) if reader.errors.is_empty() => Ok(field),
        _ => Err(reader.errors),
    }
}

fn schema_from(document: &Value) -> Result<Schema, SpecErrors> {
    let Some(map) = document.as_object() else {
        return Err(SpecErrors::single(SpecErrorKind::DocumentNotObject(
            json_type_name(document),
        )));
    };

    let mut reader = SpecReader::new(map);
    let strict = reader.bool("strict").unwrap_or(false);
    let specs = match map.get("fields") {
        None => &[][..],
        Some(Value::Array(specs)) => specs.as_slice(),
        Some(_) => {
            reader.errors.push(SpecErrorKind::FieldsNotArray);
            return Err(reader.errors);
        }
    };

    let mut errors = reader.errors;
    let mut fields = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        match compile_field(spec) {
            Ok(field) => fields.push(field),
            Err(child) => errors.absorb(spec_segment(spec, index), child),
        }
    }

    if errors.is_empty() {
        Ok(Schema::new(fields).with_strict(strict))
    } else {
        Err(errors)
    }
}

/// Names a field spec in error paths: its `name` when usable, else its
/// position.
fn spec_segment(spec: &Value, index: usize) -> PathSegment {
    spec_name(spec).unwrap_or(PathSegment::Index(index))
}

fn spec_name(spec: &Value) -> Option<PathSegment> {
    match spec.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => Some(PathSegment::Key(name.to_string())),
        _ => None,
    }
}

fn integer_field(name: String, required: bool, reader: &mut SpecReader<'_>) -> IntegerField {
    let rules = reader.numeric_rules(as_whole_number, "an integer");
    let field = IntegerField::new(name).with_rules(rules);
    if required { field.required() } else { field }
}

fn float_field(name: String, required: bool, reader: &mut SpecReader<'_>) -> FloatField {
    let rules = reader.numeric_rules(Value::as_f64, "a number");
    let field = FloatField::new(name).with_rules(rules);
    if required { field.required() } else { field }
}

fn string_field(name: String, required: bool, reader: &mut SpecReader<'_>) -> StringField {
    let mut field = StringField::new(name);
    if required {
        field = field.required();
    }
    if let Some(length) = reader.length("min_length") {
        field = field.min_length(length);
    }
    if let Some(length) = reader.length("max_length") {
        field = field.max_length(length);
    }
    if let Some(pattern) = reader.read("format", "a string", Value::as_str) {
        match Regex::new(pattern) {
            Ok(format) => field = field.with_format(format),
            Err(err) => reader.errors.push(SpecErrorKind::InvalidPattern {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            }),
        }
    }
    if let Some(choices) = reader.read("choices", "a list of strings", string_list) {
        field = field.choices(choices);
    }
    field
}

fn boolean_field(name: String, required: bool, reader: &mut SpecReader<'_>) -> BooleanField {
    let mut field = BooleanField::new(name);
    if required {
        field = field.required();
    }
    if let Some(expected) = reader.bool("value") {
        field = field.should_be(expected);
    }
    field
}

/// Every nested item spec is compiled, even when the array is malformed,
/// so their errors are reported alongside the array's own.
fn array_field(name: String, required: bool, reader: &mut SpecReader<'_>) -> Option<ArrayField> {
    let map = reader.map;
    let items = map.get("items");
    let fix_items = reader.read("fix_items", "a list of field specs", Value::as_array);
    let fix_items = fix_items.filter(|specs| !specs.is_empty());
    let min_length = reader.length("min_length");
    let max_length = reader.length("max_length");

    match (items, fix_items) {
        (Some(_), Some(_)) => reader.errors.push(SpecErrorKind::ConflictingItems),
        (None, None) => reader.errors.push(SpecErrorKind::MissingItems),
        _ => {}
    }

    let item = items.and_then(|item| match compile_field(item) {
        Ok(item) => Some(item),
        Err(child) => {
            let child = match spec_name(item) {
                Some(segment) => {
                    let mut named = SpecErrors::new();
                    named.absorb(segment, child);
                    named
                }
                None => child,
            };
            reader.errors.absorb(PathSegment::Key("items".into()), child);
            None
        }
    });

    let fixed = fix_items.and_then(|specs| {
        let mut nested = SpecErrors::new();
        let mut fields = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            match compile_field(spec) {
                Ok(field) => fields.push(field),
                Err(child) => nested.absorb(spec_segment(spec, index), child),
            }
        }
        if nested.is_empty() {
            Some(fields)
        } else {
            reader.errors.absorb(PathSegment::Key("fix_items".into()), nested);
            None
        }
    });

    let mut field = match (item, fixed) {
        (Some(item), None) if fix_items.is_none() => ArrayField::new(name, item),
        (None, Some(fields)) if items.is_none() => ArrayField::fixed(name, fields),
        _ => return None,
    };
    if required {
        field = field.required();
    }
    if let Some(length) = min_length {
        field = field.min_length(length);
    }
    if let Some(length) = max_length {
        field = field.max_length(length);
    }
    Some(field)
}

fn object_field(name: String, required: bool, reader: &mut SpecReader<'_>) -> Option<ObjectField> {
    let Some(document) = reader.map.get("schema") else {
        reader.errors.push(SpecErrorKind::MissingSchema);
        return None;
    };
    let schema = match schema_from(document) {
        Ok(schema) => schema,
        Err(child) => {
            reader.errors.absorb(PathSegment::Key("schema".into()), child);
            return None;
        }
    };

    let field = ObjectField::new(name, schema);
    Some(if required { field.required() } else { field })
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// Typed access to the keys of one spec object, recording a compile error
/// for every key present with the wrong JSON type.
struct SpecReader<'a> {
    map: &'a Map<String, Value>,
    errors: SpecErrors,
}

impl<'a> SpecReader<'a> {
    fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            errors: SpecErrors::new(),
        }
    }

    /// `None` when `key` is absent or malformed.
    fn read<T>(
        &mut self,
        key: &'static str,
        expected: &'static str,
        convert: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Option<T> {
        let map = self.map;
        let converted = convert(map.get(key)?);
        if converted.is_none() {
            self.errors
                .push(SpecErrorKind::InvalidValue { key, expected });
        }
        converted
    }

    fn bool(&mut self, key: &'static str) -> Option<bool> {
        self.read(key, "a boolean", Value::as_bool)
    }

    fn required(&mut self) -> bool {
        self.bool("required").unwrap_or(false)
    }

    /// Negative lengths are ignored rather than rejected.
    fn length(&mut self, key: &'static str) -> Option<usize> {
        let length = self.read(key, "an integer", as_whole_number)?;
        usize::try_from(length).ok()
    }

    fn kind(&mut self) -> Option<FieldKind> {
        match self.map.get("type") {
            None => {
                self.errors.push(SpecErrorKind::MissingType);
                None
            }
            Some(Value::String(raw)) => match raw.parse() {
                Ok(kind) => Some(kind),
                Err(unknown) => {
                    self.errors.push(SpecErrorKind::UnknownType(unknown));
                    None
                }
            },
            Some(_) => {
                self.errors.push(SpecErrorKind::TypeNotString);
                None
            }
        }
    }

    fn name(&mut self) -> Option<String> {
        match self.map.get("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => {
                self.errors.push(SpecErrorKind::MissingName);
                None
            }
        }
    }

    fn numeric_rules<T: Numeric>(
        &mut self,
        convert: fn(&Value) -> Option<T>,
        expected: &'static str,
    ) -> NumericRules<T> {
        let mut rules = NumericRules::default();
        rules.min = self.read("min", expected, convert);
        rules.max = self.read("max", expected, convert);
        rules.sign = self.bool("positive").map(|positive| {
            if positive { Sign::Positive } else { Sign::Negative }
        });
        rules.ranges = self.read(
            "ranges",
            "a list of {\"start\", \"end\"} objects",
            |value| {
                value
                    .as_array()?
                    .iter()
                    .map(|range| {
                        Some(NumericRange {
                            start: convert(range.get("start")?)?,
                            end: convert(range.get("end")?)?,
                        })
                    })
                    .collect()
            },
        );
        rules
    }
}
