//! Error types for catalog loading and configuration.

use thiserror::Error;

/// Errors that can occur while loading a catalog or a config file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A schema document failed to parse or compile.
    #[error("invalid schema {name}: {source}")]
    Schema {
        name: String,
        #[source]
        source: fieldcheck_core::Error,
    },

    /// All configured loader sources failed.
    #[error("no schema sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
