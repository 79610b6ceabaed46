use serde_json::Value;

use super::{missing, mismatch};
use crate::kind::FieldKind;
use crate::violation::{ViolationKind, Violations};

/// Validates booleans, optionally pinned to one expected value.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanField {
    name: String,
    required: bool,
    expected: Option<bool>,
}

impl BooleanField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            expected: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Requires the value to equal `expected`.
    pub fn should_be(mut self, expected: bool) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn expected(&self) -> Option<bool> {
        self.expected
    }

    pub fn validate(&self, value: &Value) -> Violations {
        if value.is_null() {
            return missing(&self.name, self.required);
        }
        let Some(actual) = value.as_bool() else {
            return mismatch(&self.name, FieldKind::Boolean, value);
        };

        match self.expected {
            Some(expected) if actual != expected => {
                Violations::single(&self.name, ViolationKind::UnexpectedBoolean { expected })
            }
            _ => Violations::new(),
        }
    }
}
