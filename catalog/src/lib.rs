//! Named schema catalogs and the command-line configuration file.
//!
//! A [`SchemaCatalog`] holds compiled [`Schema`](fieldcheck_core::Schema)s
//! keyed by name. Catalogs load from a single schema document, a directory
//! of `*.json` documents, or a bundle file, and [`CatalogBuilder`] chains
//! those sources with fallback.
//!
//! # Quick start
//!
//! ```no_run
//! use fieldcheck_catalog::{CliConfig, SchemaCatalog};
//! use serde_json::json;
//!
//! let catalog = SchemaCatalog::from_dir("schemas/").unwrap();
//! if let Some(violations) = catalog.validate("user", &json!({"name": "James"})) {
//!     for violation in violations.iter() {
//!         println!("{violation}");
//!     }
//! }
//!
//! // Directory first, bundle as fallback
//! let catalog = SchemaCatalog::builder()
//!     .from_dir("schemas/")
//!     .from_bundle("schemas.bundle.json")
//!     .build()
//!     .unwrap();
//!
//! let config = CliConfig::load("fieldcheck.yml").unwrap();
//! println!("{} parallel jobs", config.validation.jobs);
//! ```

mod config;
mod error;
mod loader;

pub use config::{CatalogConfig, CliConfig, OutputConfig, OutputFormat, ValidationConfig};
pub use error::{CatalogError, Result};
pub use loader::{CatalogBuilder, CatalogSource, SchemaCatalog};
