use serde_json::Value;

use super::{missing, mismatch};
use crate::kind::FieldKind;
use crate::schema::Schema;
use crate::violation::{ViolationKind, Violations};

/// Validates a nested object against its own [`Schema`].
///
/// Accepts a JSON object, or a JSON string holding the text of one. The
/// nested schema's strict flag applies to the nested object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    name: String,
    required: bool,
    schema: Schema,
}

impl ObjectField {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            required: false,
            schema,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Violations come back with paths relative to the nested object.
    pub fn validate(&self, value: &Value) -> Violations {
        match value {
            Value::Null => missing(&self.name, self.required),
            Value::Object(_) => self.schema.validate(value),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(decoded @ Value::Object(_)) => self.schema.validate(&decoded),
                Ok(decoded) => mismatch(&self.name, FieldKind::Object, &decoded),
                Err(err) => Violations::single(
                    &self.name,
                    ViolationKind::InvalidJson {
                        reason: err.to_string(),
                    },
                ),
            },
            other => mismatch(&self.name, FieldKind::Object, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::field::IntegerField;

    fn person(strict: bool) -> ObjectField {
        let mut schema = Schema::new(vec![
            IntegerField::new("age").required().min(0).max(90).into(),
        ]);
        if strict {
            schema = schema.strict();
        }
        ObjectField::new("person", schema)
    }

    #[test]
    fn test_null_handling() {
        assert!(person(false).validate(&Value::Null).is_empty());
        assert_eq!(person(false).required().validate(&Value::Null).len(), 1);
    }

    #[test]
    fn test_structured_value() {
        assert!(person(false).validate(&json!({"age": 10})).is_empty());
        let violations = person(false).validate(&json!({"age": 100}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.iter().next().unwrap().location(), "age");
    }

    #[test]
    fn test_raw_json_text() {
        assert!(person(false).validate(&json!(r#"{"age":10}"#)).is_empty());
        assert_eq!(person(false).validate(&json!(r#"{"age":-1}"#)).len(), 1);
    }

    #[test]
    fn test_raw_text_that_does_not_parse() {
        let violations = person(false).validate(&json!("{{"));
        assert!(matches!(
            violations.iter().next().unwrap().kind,
            ViolationKind::InvalidJson { .. }
        ));
    }

    #[test]
    fn test_raw_text_that_is_not_an_object() {
        let violations = person(false).validate(&json!("[1, 2]"));
        assert_eq!(
            violations.iter().next().unwrap().kind,
            ViolationKind::TypeMismatch {
                expected: FieldKind::Object,
                found: "array",
            }
        );
    }

    #[test]
    fn test_wrong_type() {
        let violations = person(false).validate(&json!(1));
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations.iter().next().unwrap().kind,
            ViolationKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_strict_nested_schema() {
        let input = json!({"age": 10, "extra": "x"});
        assert!(person(false).validate(&input).is_empty());

        let violations = person(true).validate(&input);
        assert_eq!(violations.len(), 1);
        let violation = violations.iter().next().unwrap();
        assert_eq!(violation.kind, ViolationKind::UnknownField);
        assert_eq!(violation.location(), "extra");
    }
}
