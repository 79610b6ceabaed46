use serde_json::Value;

use crate::violation::{ViolationKind, Violations};

/// Requires the value to be JSON `null`.
///
/// An absent key reaches the field as `null` too, so both pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NullField {
    name: String,
}

impl NullField {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self, value: &Value) -> Violations {
        if value.is_null() {
            Violations::new()
        } else {
            Violations::single(&self.name, ViolationKind::NotNull)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_null_passes() {
        assert!(NullField::new("nothing").validate(&Value::Null).is_empty());
    }

    #[test]
    fn test_anything_else_fails() {
        let field = NullField::new("nothing");
        for value in [json!(0), json!(""), json!(false), json!([]), json!({})] {
            let violations = field.validate(&value);
            assert_eq!(violations.len(), 1, "{value} should fail");
            assert_eq!(violations.iter().next().unwrap().kind, ViolationKind::NotNull);
        }
    }
}
