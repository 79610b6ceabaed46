use std::io::Write;
use std::path::Path;

use fieldcheck_catalog::{CatalogError, CatalogSource, CliConfig, SchemaCatalog};
use fieldcheck_core::ViolationKind;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_json(path: &Path, document: &Value) {
    let mut f = std::fs::File::create(path).unwrap();
    serde_json::to_writer_pretty(&mut f, document).unwrap();
    f.flush().unwrap();
}

fn user_document() -> Value {
    json!({
        "strict": true,
        "fields": [
            {"name": "name", "type": "string", "required": true, "min_length": 2},
            {"name": "age", "type": "integer", "min": 0}
        ]
    })
}

fn order_document() -> Value {
    json!({
        "fields": [
            {"name": "id", "type": "integer", "required": true, "positive": true},
            {"name": "lines", "type": "array", "min_length": 1, "items": {
                "name": "line", "type": "object", "schema": {"fields": [
                    {"name": "sku", "type": "string", "required": true, "format": "^[A-Z]{3}-[0-9]+$"},
                    {"name": "qty", "type": "integer", "ranges": [{"start": 1, "end": 99}]}
                ]}
            }}
        ]
    })
}

// ---------------------------------------------------------------------------
// Directory loading
// ---------------------------------------------------------------------------

#[test]
fn test_directory_catalog_validates_by_name() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("user.json"), &user_document());
    write_json(&dir.path().join("order.json"), &order_document());

    let catalog = SchemaCatalog::from_dir(dir.path()).unwrap();
    assert_eq!(catalog.len(), 2);

    let violations = catalog
        .validate("order", &json!({"id": 7, "lines": [{"sku": "ABC-1", "qty": 3}, {"sku": "bad", "qty": 100}]}))
        .unwrap();
    let locations: Vec<String> = violations.iter().map(|v| v.location()).collect();
    assert_eq!(locations, vec!["lines[1].sku", "lines[1].qty"]);

    let violations = catalog
        .validate("user", &json!({"name": "James", "email": "x"}))
        .unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.iter().next().unwrap().kind, ViolationKind::UnknownField);
}

// ---------------------------------------------------------------------------
// Bundle loading
// ---------------------------------------------------------------------------

#[test]
fn test_bundle_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemas.bundle.json");
    write_json(
        &path,
        &json!({"schemas": {"user": user_document(), "order": order_document()}}),
    );

    let catalog = SchemaCatalog::from_bundle(&path).unwrap();
    assert!(catalog.contains("user"));
    assert!(catalog.contains("order"));
    assert!(catalog.get("user").unwrap().is_strict());
}

#[test]
fn test_bundle_with_invalid_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemas.bundle.json");
    write_json(
        &path,
        &json!({"schemas": {"broken": {"fields": [{"name": "tags", "type": "array"}]}}}),
    );

    let err = SchemaCatalog::from_bundle(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Schema { ref name, .. } if name == "broken"));
    assert!(err.to_string().contains("tags"));
}

#[test]
fn test_bundle_missing_schemas_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemas.bundle.json");
    write_json(&path, &json!({"fields": []}));

    assert!(matches!(
        SchemaCatalog::from_bundle(&path),
        Err(CatalogError::Json(_))
    ));
}

// ---------------------------------------------------------------------------
// Config-driven fallback chain
// ---------------------------------------------------------------------------

#[test]
fn test_config_catalog_falls_back_to_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("schemas.bundle.json");
    write_json(&bundle, &json!({"schemas": {"user": user_document()}}));

    let config_path = dir.path().join("fieldcheck.yml");
    let yaml = format!(
        "catalog:\n  dirs:\n    - {}\n  bundles:\n    - {}\n",
        dir.path().join("missing-dir").display(),
        bundle.display()
    );
    std::fs::write(&config_path, yaml).unwrap();

    let config = CliConfig::load(&config_path).unwrap();
    let catalog = config.catalog_builder().unwrap().build().unwrap();
    assert!(catalog.contains("user"));
    assert!(matches!(catalog.source(), CatalogSource::Multiple(sources) if sources.len() == 2));
}

#[test]
fn test_saved_bundle_reloads_equal() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("user.json"), &user_document());
    write_json(&dir.path().join("order.json"), &order_document());
    let catalog = SchemaCatalog::from_dir(dir.path()).unwrap();

    let bundle = dir.path().join("out.bundle.json");
    catalog.save_bundle(&bundle).unwrap();
    let reloaded = SchemaCatalog::from_bundle(&bundle).unwrap();

    for name in ["user", "order"] {
        assert_eq!(reloaded.get(name), catalog.get(name), "{name}");
    }
}
