//! Configuration file for the `fieldcheck` command line.
//!
//! Every section is optional and falls back to its defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! catalog:
//!   dirs:
//!     - schemas/
//!   bundles:
//!     - schemas.bundle.json
//! output:
//!   format: json
//!   max_violations: 20
//! validation:
//!   jobs: 8
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::CatalogBuilder;

/// Where named schemas are looked up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directories of `*.json` schema documents, tried first.
    pub dirs: Vec<PathBuf>,
    /// Bundle files, tried after the directories.
    pub bundles: Vec<PathBuf>,
}

/// How violations are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `location: message` line per violation.
    #[default]
    Text,
    /// One JSON report per input.
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Violations printed per input; `0` prints all of them.
    pub max_violations: usize,
}

/// Settings controlling how documents are validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Number of documents validated in parallel.
    pub jobs: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}

/// Top-level command-line configuration.
///
/// # Examples
///
/// ```
/// use fieldcheck_catalog::{CliConfig, OutputFormat};
///
/// let config: CliConfig = serde_yaml::from_str("output: { format: json }").unwrap();
/// assert_eq!(config.output.format, OutputFormat::Json);
/// assert_eq!(config.validation.jobs, 4);
/// assert!(config.catalog_builder().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
    pub validation: ValidationConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: "1.0".into(),
            catalog: CatalogConfig::default(),
            output: OutputConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::CatalogError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::CatalogError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Fallback chain over the configured directories, then bundles.
    ///
    /// Returns `None` when no catalog source is configured.
    pub fn catalog_builder(&self) -> Option<CatalogBuilder> {
        let builder = self
            .catalog
            .dirs
            .iter()
            .fold(CatalogBuilder::new(), |builder, dir| builder.from_dir(dir));
        let builder = self
            .catalog
            .bundles
            .iter()
            .fold(builder, |builder, bundle| builder.from_bundle(bundle));
        (!builder.is_empty()).then_some(builder)
    }
}
