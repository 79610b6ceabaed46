//! Schema catalog loading with builder pattern and fallback chains.
//!
//! Provides [`SchemaCatalog`] for lookup of compiled schemas by name and
//! [`CatalogBuilder`] for constructing a catalog from multiple sources with
//! automatic fallback.
//!
//! # Sources
//!
//! - a single schema document, named after its file stem
//!   (`schemas/user.json` is `user`);
//! - a directory of `*.json` schema documents, each named by its stem;
//! - a bundle file holding many documents keyed by name:
//!
//! ```json
//! { "schemas": { "user": { "fields": [...] }, "order": { "fields": [...] } } }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fieldcheck_core::{Schema, Violations};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// Describes where a [`SchemaCatalog`] was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// Built in memory.
    Memory,
    /// Loaded from a single schema document.
    File(PathBuf),
    /// Loaded from a directory of schema documents.
    Directory(PathBuf),
    /// Loaded from a bundle file.
    Bundle(PathBuf),
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<CatalogSource>),
}

#[derive(Deserialize)]
struct BundleDocument {
    schemas: Map<String, Value>,
}

#[derive(Serialize)]
struct BundleRef<'a> {
    schemas: BTreeMap<&'a str, &'a Schema>,
}

/// Compiled schemas with O(1) lookup by name.
///
/// # Examples
///
/// ```
/// use fieldcheck_catalog::SchemaCatalog;
/// use fieldcheck_core::{IntegerField, Schema};
/// use serde_json::json;
///
/// let mut catalog = SchemaCatalog::new();
/// catalog.insert("age", Schema::new(vec![IntegerField::new("age").min(0).into()]));
///
/// assert!(catalog.contains("age"));
/// assert_eq!(catalog.validate("age", &json!({"age": -1})).unwrap().len(), 1);
/// assert!(catalog.validate("missing", &json!({})).is_none());
/// ```
#[derive(Debug)]
pub struct SchemaCatalog {
    schemas: HashMap<String, Schema>,
    source: CatalogSource,
}

impl SchemaCatalog {
    /// Creates an empty in-memory catalog.
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
            source: CatalogSource::Memory,
        }
    }

    /// Returns a new [`CatalogBuilder`] for configuring a fallback chain.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Loads one schema document, named after the file stem.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, or
    /// [`CatalogError::Schema`] if it does not parse or compile.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (name, schema) = load_document(path)?;

        let mut schemas = HashMap::new();
        schemas.insert(name, schema);
        Ok(Self {
            schemas,
            source: CatalogSource::File(path.to_path_buf()),
        })
    }

    /// Loads every `*.json` schema document in a directory.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the directory cannot be read, or
    /// [`CatalogError::Schema`] for the first document that fails to compile.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut schemas = HashMap::new();

        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.extension().and_then(|e| e.to_str()) == Some("json") {
                let (name, schema) = load_document(&file_path)?;
                schemas.insert(name, schema);
            }
        }

        Ok(Self {
            schemas,
            source: CatalogSource::Directory(path.to_path_buf()),
        })
    }

    /// Loads a bundle file of named schema documents.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read,
    /// [`CatalogError::Json`] if it is not a bundle, or
    /// [`CatalogError::Schema`] for the first document that fails to compile.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let bundle: BundleDocument = serde_json::from_reader(BufReader::new(file))?;

        let mut schemas = HashMap::with_capacity(bundle.schemas.len());
        for (name, document) in bundle.schemas {
            let schema = Schema::from_value(&document).map_err(|source| CatalogError::Schema {
                name: name.clone(),
                source,
            })?;
            debug!(name = %name, bundle = %path.display(), "Loaded schema");
            schemas.insert(name, schema);
        }

        Ok(Self {
            schemas,
            source: CatalogSource::Bundle(path.to_path_buf()),
        })
    }

    /// Writes every schema to a bundle file, names in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be written.
    pub fn save_bundle(&self, path: impl AsRef<Path>) -> Result<()> {
        let bundle = BundleRef {
            schemas: self
                .schemas
                .iter()
                .map(|(name, schema)| (name.as_str(), schema))
                .collect(),
        };
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &bundle)?;
        writer.flush()?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Inserts a schema, replacing any existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns an iterator over schema names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(|s| s.as_str())
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Validates `value` against the schema called `name`.
    ///
    /// Returns `None` when the catalog has no such schema.
    pub fn validate(&self, name: &str, value: &Value) -> Option<Violations> {
        self.get(name).map(|schema| schema.validate(value))
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn load_document(path: &Path) -> Result<(String, Schema)> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let input = std::fs::read(path)?;
    let schema = Schema::from_slice(&input).map_err(|source| CatalogError::Schema {
        name: name.clone(),
        source,
    })?;
    debug!(
        name = %name,
        path = %path.display(),
        fields = schema.fields().len(),
        "Loaded schema"
    );
    Ok((name, schema))
}

/// Builder for constructing a [`SchemaCatalog`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`CatalogError::NoSourcesAvailable`] is returned.
///
/// # Example
///
/// ```no_run
/// use fieldcheck_catalog::SchemaCatalog;
///
/// let catalog = SchemaCatalog::builder()
///     .from_dir("/etc/fieldcheck/schemas/")
///     .from_bundle("/etc/fieldcheck/schemas.bundle.json")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    sources: Vec<CatalogSource>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory of schema documents as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::Directory(path.into()));
        self
    }

    /// Adds a bundle file as a source.
    pub fn from_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::Bundle(path.into()));
        self
    }

    /// Adds a single schema document as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::File(path.into()));
        self
    }

    /// Returns `true` if no source has been added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Attempts to load schemas from configured sources in order.
    pub fn build(self) -> Result<SchemaCatalog> {
        if self.sources.is_empty() {
            return Err(CatalogError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                CatalogSource::File(path) => SchemaCatalog::from_file(path),
                CatalogSource::Directory(path) => SchemaCatalog::from_dir(path),
                CatalogSource::Bundle(path) => SchemaCatalog::from_bundle(path),
                CatalogSource::Memory | CatalogSource::Multiple(_) => continue,
            };

            match result {
                Ok(mut catalog) => {
                    info!(schemas = catalog.len(), source = ?source, "Loaded schema catalog");
                    catalog.source = CatalogSource::Multiple(all_sources);
                    return Ok(catalog);
                }
                Err(err) => {
                    warn!(source = ?source, error = %err, "Catalog source failed, trying next");
                }
            }
        }

        Err(CatalogError::NoSourcesAvailable)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use serde_json::json;

    fn write_document(dir: &Path, name: &str, document: &Value) -> PathBuf {
        let path = dir.join(format!("{name}.json"));
        let mut f = std::fs::File::create(&path).unwrap();
        serde_json::to_writer_pretty(&mut f, document).unwrap();
        f.flush().unwrap();
        path
    }

    fn user_document() -> Value {
        json!({"fields": [{"name": "name", "type": "string", "required": true}]})
    }

    #[test]
    fn test_from_file_named_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_document(dir.path(), "user", &user_document());

        let catalog = SchemaCatalog::from_file(&path).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["user"]);
        assert_eq!(catalog.source(), &CatalogSource::File(path));
    }

    #[test]
    fn test_from_dir_skips_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "user", &user_document());
        write_document(dir.path(), "order", &json!({"fields": []}));
        std::fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();

        let catalog = SchemaCatalog::from_dir(dir.path()).unwrap();
        let mut names: Vec<&str> = catalog.names().collect();
        names.sort();
        assert_eq!(names, vec!["order", "user"]);
    }

    #[test]
    fn test_invalid_document_names_the_schema() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "broken", &json!({"fields": [{"name": "x"}]}));

        let err = SchemaCatalog::from_dir(dir.path()).unwrap_err();
        match err {
            CatalogError::Schema { name, source } => {
                assert_eq!(name, "broken");
                assert!(source.spec_errors().is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bundle_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");

        let mut catalog = SchemaCatalog::new();
        catalog.insert("user", Schema::from_value(&user_document()).unwrap());
        catalog.insert("empty", Schema::default().strict());
        catalog.save_bundle(&path).unwrap();

        let loaded = SchemaCatalog::from_bundle(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("user"), catalog.get("user"));
        assert!(loaded.get("empty").unwrap().is_strict());
        assert_eq!(loaded.source(), &CatalogSource::Bundle(path));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_bundle_reports_write_failure() {
        let mut catalog = SchemaCatalog::new();
        catalog.insert("user", Schema::from_value(&user_document()).unwrap());

        let err = catalog.save_bundle("/dev/full").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_builder_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_document(dir.path(), "user", &user_document());

        let catalog = SchemaCatalog::builder()
            .from_dir("/nonexistent/dir/")
            .from_bundle("/nonexistent/bundle.json")
            .from_file(&path)
            .build()
            .unwrap();
        assert!(catalog.contains("user"));
        assert!(matches!(catalog.source(), CatalogSource::Multiple(s) if s.len() == 3));
    }

    #[test]
    fn test_builder_all_fail() {
        let result = SchemaCatalog::builder()
            .from_dir("/nonexistent/dir1/")
            .from_bundle("/nonexistent/bundle1.json")
            .build();
        assert!(matches!(result, Err(CatalogError::NoSourcesAvailable)));
        assert!(matches!(
            CatalogBuilder::new().build(),
            Err(CatalogError::NoSourcesAvailable)
        ));
    }

    #[test]
    fn test_validate_by_name() {
        let mut catalog = SchemaCatalog::new();
        catalog.insert("user", Schema::from_value(&user_document()).unwrap());

        assert!(catalog.validate("user", &json!({"name": "James"})).unwrap().is_empty());
        assert_eq!(catalog.validate("user", &json!({})).unwrap().len(), 1);
        assert!(catalog.validate("order", &json!({})).is_none());
        assert!(!catalog.is_empty());
    }
}
