use serde_json::Value;

use super::{Field, missing, mismatch};
use crate::kind::FieldKind;
use crate::path::PathSegment;
use crate::violation::{ViolationKind, Violations};

/// How the elements of an array are validated.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItems {
    /// Every element is validated against the same field.
    Uniform(Box<Field>),
    /// Element `i` is validated against field `i`; the array length must
    /// equal the number of fields.
    Fixed(Vec<Field>),
}

/// Validates arrays: their length and each element.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::{ArrayField, Field, IntegerField, StringField};
/// use serde_json::json;
///
/// let scores = ArrayField::new("scores", IntegerField::new("score").range(0, 20))
///     .min_length(2)
///     .max_length(4);
/// assert!(scores.validate(&json!([10, 20, 15])).is_empty());
/// assert_eq!(scores.validate(&json!([10])).len(), 1);
///
/// let pair = ArrayField::fixed(
///     "pair",
///     vec![IntegerField::new("id").into(), StringField::new("label").into()],
/// );
/// assert!(pair.validate(&json!([1, "one"])).is_empty());
/// assert_eq!(pair.validate(&json!(["one", 1])).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayField {
    name: String,
    required: bool,
    items: ArrayItems,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl ArrayField {
    /// Homogeneous array: every element must satisfy `item`.
    pub fn new(name: impl Into<String>, item: impl Into<Field>) -> Self {
        Self::with_items(name, ArrayItems::Uniform(Box::new(item.into())))
    }

    /// Positional array: one field per element.
    pub fn fixed(name: impl Into<String>, items: Vec<Field>) -> Self {
        Self::with_items(name, ArrayItems::Fixed(items))
    }

    pub fn with_items(name: impl Into<String>, items: ArrayItems) -> Self {
        Self {
            name: name.into(),
            required: false,
            items,
            min_length: None,
            max_length: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn items(&self) -> &ArrayItems {
        &self.items
    }

    pub fn min_len(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_length
    }

    pub fn validate(&self, value: &Value) -> Violations {
        if value.is_null() {
            return missing(&self.name, self.required);
        }
        let Some(elements) = value.as_array() else {
            return mismatch(&self.name, FieldKind::Array, value);
        };

        let mut violations = Violations::new();

        if let Some(min) = self.min_length {
            if elements.len() < min {
                violations.push(&self.name, ViolationKind::TooFewItems { min });
            }
        }

        if let Some(max) = self.max_length {
            if elements.len() > max {
                violations.push(&self.name, ViolationKind::TooManyItems { max });
            }
        }

        match &self.items {
            ArrayItems::Uniform(item) => {
                for (index, element) in elements.iter().enumerate() {
                    violations.absorb(PathSegment::Index(index), item.validate(element));
                }
            }
            ArrayItems::Fixed(fields) => {
                if fields.len() != elements.len() {
                    violations.push(
                        &self.name,
                        ViolationKind::FixedLengthMismatch {
                            expected: fields.len(),
                            found: elements.len(),
                        },
                    );
                    return violations;
                }
                for (index, (field, element)) in fields.iter().zip(elements).enumerate() {
                    violations.absorb(PathSegment::Index(index), field.validate(element));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::field::{IntegerField, StringField};

    fn scores() -> ArrayField {
        ArrayField::new("scores", IntegerField::new("score").required().range(0, 20))
    }

    #[test]
    fn test_null_handling() {
        assert!(scores().validate(&Value::Null).is_empty());
        assert_eq!(scores().required().validate(&Value::Null).len(), 1);
    }

    #[test]
    fn test_type_mismatch() {
        let violations = scores().min_length(3).validate(&json!({"a": 1}));
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations.iter().next().unwrap().kind,
            ViolationKind::TypeMismatch {
                expected: FieldKind::Array,
                found: "object",
            }
        );
    }

    #[test]
    fn test_length_bounds() {
        let field = scores().min_length(2).max_length(4);
        assert_eq!(field.validate(&json!([1])).len(), 1);
        assert!(field.validate(&json!([1, 2])).is_empty());
        assert!(field.validate(&json!([1, 2, 3])).is_empty());
        assert!(field.validate(&json!([1, 2, 3, 4])).is_empty());
        assert_eq!(field.validate(&json!([1, 2, 3, 4, 5])).len(), 1);
    }

    #[test]
    fn test_every_bad_item_reported_with_index() {
        let violations = scores().validate(&json!([1, 25, "x", 3, 40]));
        let locations: Vec<String> = violations.iter().map(|v| v.location()).collect();
        assert_eq!(locations, vec!["[1]", "[2]", "[4]"]);
        assert!(violations.iter().all(|v| v.field == "score"));
    }

    #[test]
    fn test_length_and_item_violations_collected_together() {
        let violations = scores().max_length(1).validate(&json!([1, 99]));
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_null_item_checked_against_item_field() {
        let violations = scores().validate(&json!([1, null]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.iter().next().unwrap().kind, ViolationKind::Required);
    }

    fn pair() -> ArrayField {
        ArrayField::fixed(
            "pair",
            vec![
                IntegerField::new("id").into(),
                StringField::new("label").into(),
            ],
        )
    }

    #[test]
    fn test_fixed_items_match() {
        assert!(pair().validate(&json!([1, "one"])).is_empty());
    }

    #[test]
    fn test_fixed_items_length_mismatch_short_circuits() {
        let violations = pair().validate(&json!(["x", 1, 2]));
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations.iter().next().unwrap().kind,
            ViolationKind::FixedLengthMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_fixed_items_swapped_types_reports_both_positions() {
        let violations = pair().validate(&json!(["a", 1]));
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "label"]);
    }

    #[test]
    fn test_fixed_mismatch_keeps_length_bound_violations() {
        let violations = pair().min_length(3).validate(&json!([1]));
        assert_eq!(violations.len(), 2);
    }
}
