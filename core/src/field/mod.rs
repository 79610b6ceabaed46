//! Field variants.
//!
//! A [`Field`] is one named, typed validation unit. Each kind owns its own
//! constraint state and implements the same contract:
//!
//! 1. `null` (or an absent key) passes unless the field is required.
//! 2. A value of the wrong JSON type yields a single type mismatch and no
//!    further checks.
//! 3. Every configured constraint runs and all failures are collected.
//!
//! Fields are built with consuming builder methods and are read-only once
//! built, so a compiled tree can be shared across threads.

mod array;
mod boolean;
mod null;
mod numeric;
mod object;
mod string;

pub use array::{ArrayField, ArrayItems};
pub use boolean::BooleanField;
pub use null::NullField;
pub use numeric::{FloatField, IntegerField, Numeric, NumericRange, NumericRules, Sign};
pub(crate) use numeric::as_whole_number;
pub use object::ObjectField;
pub use string::StringField;

use serde_json::Value;

use crate::kind::{FieldKind, json_type_name};
use crate::violation::{ViolationKind, Violations};

/// Any field kind.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::{Field, FieldKind, StringField};
/// use serde_json::json;
///
/// let field: Field = StringField::new("name").required().into();
/// assert_eq!(field.name(), "name");
/// assert_eq!(field.kind(), FieldKind::String);
/// assert!(field.validate(&json!("James")).is_empty());
/// assert_eq!(field.validate(&json!(123)).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Integer(IntegerField),
    Float(FloatField),
    String(StringField),
    Boolean(BooleanField),
    Array(ArrayField),
    Object(ObjectField),
    Null(NullField),
}

impl Field {
    /// The JSON key this field reads.
    pub fn name(&self) -> &str {
        match self {
            Field::Integer(f) => f.name(),
            Field::Float(f) => f.name(),
            Field::String(f) => f.name(),
            Field::Boolean(f) => f.name(),
            Field::Array(f) => f.name(),
            Field::Object(f) => f.name(),
            Field::Null(f) => f.name(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Integer(_) => FieldKind::Integer,
            Field::Float(_) => FieldKind::Float,
            Field::String(_) => FieldKind::String,
            Field::Boolean(_) => FieldKind::Boolean,
            Field::Array(_) => FieldKind::Array,
            Field::Object(_) => FieldKind::Object,
            Field::Null(_) => FieldKind::Null,
        }
    }

    /// Whether an absent or null value is a violation. Always `false` for
    /// null fields.
    pub fn is_required(&self) -> bool {
        match self {
            Field::Integer(f) => f.is_required(),
            Field::Float(f) => f.is_required(),
            Field::String(f) => f.is_required(),
            Field::Boolean(f) => f.is_required(),
            Field::Array(f) => f.is_required(),
            Field::Object(f) => f.is_required(),
            Field::Null(_) => false,
        }
    }

    /// Validates `value` (pass `Value::Null` for an absent key).
    pub fn validate(&self, value: &Value) -> Violations {
        match self {
            Field::Integer(f) => f.validate(value),
            Field::Float(f) => f.validate(value),
            Field::String(f) => f.validate(value),
            Field::Boolean(f) => f.validate(value),
            Field::Array(f) => f.validate(value),
            Field::Object(f) => f.validate(value),
            Field::Null(f) => f.validate(value),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(field: $ty) -> Self {
                    Field::$variant(field)
                }
            }
        )*
    };
}

impl_from_variant! {
    Integer => IntegerField,
    Float => FloatField,
    String => StringField,
    Boolean => BooleanField,
    Array => ArrayField,
    Object => ObjectField,
    Null => NullField,
}

/// Result of the shared null check.
fn missing(name: &str, required: bool) -> Violations {
    if required {
        Violations::single(name, ViolationKind::Required)
    } else {
        Violations::new()
    }
}

fn mismatch(name: &str, expected: FieldKind, value: &Value) -> Violations {
    Violations::single(
        name,
        ViolationKind::TypeMismatch {
            expected,
            found: json_type_name(value),
        },
    )
}
