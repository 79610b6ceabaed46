//! Field kinds and the JSON type names used in type-mismatch reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of field kinds.
///
/// Used both as the runtime discriminator and as the `type` key of a schema
/// document.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::FieldKind;
///
/// let kind: FieldKind = "integer".parse().unwrap();
/// assert_eq!(kind, FieldKind::Integer);
/// assert_eq!(kind.to_string(), "integer");
/// assert!("decimal".parse::<FieldKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Float,
    String,
    Boolean,
    Array,
    Object,
    Null,
}

impl FieldKind {
    /// All kinds, in schema-document order.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Integer,
        FieldKind::Float,
        FieldKind::String,
        FieldKind::Boolean,
        FieldKind::Array,
        FieldKind::Object,
        FieldKind::Null,
    ];

    /// The `type` key value for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
            FieldKind::Null => "null",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Names the JSON type of `value` the way violations report it.
///
/// Numbers without a fractional part are `integer`, other numbers `float`.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => "integer",
            _ => "float",
        },
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_every_kind() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.as_str().parse::<FieldKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let raw = serde_json::to_string(&FieldKind::Boolean).unwrap();
        assert_eq!(raw, "\"boolean\"");
        let kind: FieldKind = serde_json::from_str("\"null\"").unwrap();
        assert_eq!(kind, FieldKind::Null);
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(3)), "integer");
        assert_eq!(json_type_name(&json!(3.0)), "integer");
        assert_eq!(json_type_name(&json!(3.5)), "float");
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
