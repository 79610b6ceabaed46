use regex::Regex;
use serde_json::Value;

use super::{missing, mismatch};
use crate::kind::FieldKind;
use crate::violation::{ViolationKind, Violations};

/// Validates strings by length, regular-expression format, or an allowed
/// set of literals.
///
/// When choices are configured they override every other rule: membership
/// alone decides validity.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::StringField;
/// use serde_json::json;
///
/// let car = StringField::new("car").min_length(10).choices(["pride", "audi"]);
/// assert!(car.validate(&json!("audi")).is_empty());
/// assert_eq!(car.validate(&json!("mercedes-benz")).len(), 1);
///
/// let email = StringField::new("email").format(r"^\S+@\S+$").unwrap();
/// assert!(email.validate(&json!("a@b.c")).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct StringField {
    name: String,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    format: Option<Regex>,
    choices: Option<Vec<String>>,
}

impl StringField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            min_length: None,
            max_length: None,
            format: None,
            choices: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Minimum length in characters.
    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    /// Maximum length in characters.
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Requires the value to match `pattern` (unanchored, as written).
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] when `pattern` does not compile.
    pub fn format(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.with_format(Regex::new(pattern)?))
    }

    /// Same as [`format`](Self::format) with an already compiled expression.
    pub fn with_format(mut self, format: Regex) -> Self {
        self.format = Some(format);
        self
    }

    /// Restricts the value to the given literals.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn min_len(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_length
    }

    pub fn format_pattern(&self) -> Option<&str> {
        self.format.as_ref().map(Regex::as_str)
    }

    pub fn allowed_choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    pub fn validate(&self, value: &Value) -> Violations {
        if value.is_null() {
            return missing(&self.name, self.required);
        }
        let Some(text) = value.as_str() else {
            return mismatch(&self.name, FieldKind::String, value);
        };

        if let Some(choices) = &self.choices {
            if choices.iter().any(|choice| choice == text) {
                return Violations::new();
            }
            return Violations::single(
                &self.name,
                ViolationKind::NotAChoice {
                    choices: choices.clone(),
                },
            );
        }

        let mut violations = Violations::new();
        let length = text.chars().count();

        if let Some(min) = self.min_length {
            if length < min {
                violations.push(&self.name, ViolationKind::TooFewCharacters { min });
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                violations.push(&self.name, ViolationKind::TooManyCharacters { max });
            }
        }

        if let Some(format) = &self.format {
            if !format.is_match(text) {
                violations.push(
                    &self.name,
                    ViolationKind::FormatMismatch {
                        pattern: format.as_str().to_string(),
                    },
                );
            }
        }

        violations
    }
}

impl PartialEq for StringField {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.required == other.required
            && self.min_length == other.min_length
            && self.max_length == other.max_length
            && self.format_pattern() == other.format_pattern()
            && self.choices == other.choices
    }
}
