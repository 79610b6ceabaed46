//! Error type for schema loading and document validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::compile::SpecErrors;
use crate::violation::Violations;

/// Errors returned by the entry points of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input is not syntactically valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A schema file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema document is structurally invalid.
    #[error("schema compilation failed:\n{0}")]
    Spec(#[from] SpecErrors),

    /// The document parsed but violates the schema.
    #[error("{} violation(s):\n{0}", .0.len())]
    Invalid(#[from] Violations),
}

impl Error {
    /// Returns the violations when the error is a validation failure.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Error::Invalid(violations) => Some(violations),
            _ => None,
        }
    }

    /// Returns the compile errors when the schema document was rejected.
    pub fn spec_errors(&self) -> Option<&SpecErrors> {
        match self {
            Error::Spec(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
