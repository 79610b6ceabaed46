//! Declarative validation of JSON documents.
//!
//! A [`Schema`] is an ordered list of named, typed [`Field`]s. Validation
//! never stops at the first problem: every field runs and every failure is
//! returned as a [`Violation`] carrying the path to the offending value.
//!
//! - [`IntegerField`], [`FloatField`] — bounds, sign and inclusive ranges.
//! - [`StringField`] — character length, regex format, allowed choices.
//! - [`BooleanField`], [`NullField`] — fixed expected value.
//! - [`ArrayField`] — length bounds plus uniform or positional items.
//! - [`ObjectField`] — a nested [`Schema`].
//!
//! Schemas are either built in code or compiled from a JSON schema document
//! ([`compile_schema`], [`Schema::from_file`]); compiled trees render back
//! to documents with [`Schema::to_spec`] and implement serde's traits.
//!
//! # Example
//!
//! ```
//! use fieldcheck_core::*;
//!
//! let schema: Schema = r#"{
//!     "fields": [
//!         {"name": "name", "type": "string", "required": true, "min_length": 2},
//!         {"name": "age", "type": "integer", "min": 0},
//!         {"name": "tags", "type": "array", "items": {"name": "tag", "type": "string"}}
//!     ]
//! }"#
//! .parse()
//! .unwrap();
//!
//! assert!(schema.validate_str(r#"{"name": "James", "age": 30}"#).is_ok());
//!
//! let err = schema
//!     .validate_str(r#"{"name": "J", "age": -1, "tags": ["ok", 7]}"#)
//!     .unwrap_err();
//! let violations = err.violations().unwrap();
//! assert_eq!(violations.len(), 3);
//! assert_eq!(violations.iter().last().unwrap().location(), "tags[1]");
//! ```

mod compile;
mod error;
mod field;
mod kind;
mod path;
mod schema;
mod serialize;
mod violation;

pub use compile::{SpecError, SpecErrorKind, SpecErrors, compile_field, compile_schema};
pub use error::{Error, Result};
pub use field::{
    ArrayField, ArrayItems, BooleanField, Field, FloatField, IntegerField, NullField, Numeric,
    NumericRange, NumericRules, ObjectField, Sign, StringField,
};
pub use kind::{FieldKind, json_type_name};
pub use path::{FieldPath, PathSegment};
pub use schema::Schema;
pub use violation::{Bound, Violation, ViolationKind, Violations};
