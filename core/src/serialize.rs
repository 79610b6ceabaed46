//! Compiled trees back to schema documents.
//!
//! [`Schema::to_spec`] emits only the keys the compiler reads, and only for
//! constraints that are enabled, so compiling the output yields an equal
//! tree.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::compile::compile_schema;
use crate::field::{ArrayItems, Field, Numeric, NumericRules, Sign};
use crate::schema::Schema;

impl Schema {
    /// Renders this schema as a document [`compile_schema`] accepts.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldcheck_core::{IntegerField, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::new(vec![IntegerField::new("age").min(0).into()]).strict();
    /// assert_eq!(
    ///     schema.to_spec(),
    ///     json!({
    ///         "strict": true,
    ///         "fields": [{"name": "age", "type": "integer", "min": 0}]
    ///     })
    /// );
    /// ```
    pub fn to_spec(&self) -> Value {
        let mut spec = Map::new();
        if self.is_strict() {
            spec.insert("strict".into(), Value::Bool(true));
        }
        spec.insert(
            "fields".into(),
            Value::Array(self.fields().iter().map(Field::to_spec).collect()),
        );
        Value::Object(spec)
    }
}

impl Field {
    /// Renders this field as a field spec object.
    pub fn to_spec(&self) -> Value {
        let mut spec = Map::new();
        spec.insert("name".into(), json!(self.name()));
        spec.insert("type".into(), json!(self.kind().as_str()));
        if self.is_required() {
            spec.insert("required".into(), Value::Bool(true));
        }

        match self {
            Field::Integer(field) => write_numeric(&mut spec, field.rules()),
            Field::Float(field) => write_numeric(&mut spec, field.rules()),
            Field::String(field) => {
                write_length(&mut spec, field.min_len(), field.max_len());
                if let Some(pattern) = field.format_pattern() {
                    spec.insert("format".into(), json!(pattern));
                }
                if let Some(choices) = field.allowed_choices() {
                    spec.insert("choices".into(), json!(choices));
                }
            }
            Field::Boolean(field) => {
                if let Some(expected) = field.expected() {
                    spec.insert("value".into(), Value::Bool(expected));
                }
            }
            Field::Array(field) => {
                write_length(&mut spec, field.min_len(), field.max_len());
                match field.items() {
                    ArrayItems::Uniform(item) => {
                        spec.insert("items".into(), item.to_spec());
                    }
                    ArrayItems::Fixed(items) => {
                        spec.insert(
                            "fix_items".into(),
                            Value::Array(items.iter().map(Field::to_spec).collect()),
                        );
                    }
                }
            }
            Field::Object(field) => {
                spec.insert("schema".into(), field.schema().to_spec());
            }
            Field::Null(_) => {}
        }

        Value::Object(spec)
    }
}

fn write_numeric<T: Numeric + Serialize>(spec: &mut Map<String, Value>, rules: &NumericRules<T>) {
    if let Some(min) = rules.min {
        spec.insert("min".into(), json!(min));
    }
    if let Some(max) = rules.max {
        spec.insert("max".into(), json!(max));
    }
    if let Some(sign) = rules.sign {
        spec.insert("positive".into(), Value::Bool(sign == Sign::Positive));
    }
    if let Some(ranges) = &rules.ranges {
        let ranges = ranges
            .iter()
            .map(|range| json!({"start": range.start, "end": range.end}))
            .collect();
        spec.insert("ranges".into(), Value::Array(ranges));
    }
}

fn write_length(spec: &mut Map<String, Value>, min: Option<usize>, max: Option<usize>) {
    if let Some(min) = min {
        spec.insert("min_length".into(), json!(min));
    }
    if let Some(max) = max {
        spec.insert("max_length".into(), json!(max));
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_spec().serialize(serializer)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_spec().serialize(serializer)
    }
}

/// Deserializing a schema runs the compiler; every compile error is
/// reported in the deserializer's error message.
impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Value::deserialize(deserializer)?;
        compile_schema(&document).map_err(D::Error::custom)
    }
}
