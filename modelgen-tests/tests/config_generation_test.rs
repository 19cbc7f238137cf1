//! Generation driven by `GeneratorConfig` / `ModelgenBuilder`: parsed-table
//! input, table filters and template overrides

use std::fs;
use std::path::{Path, PathBuf};

use modelgen::{CodegenError, GeneratorConfig, ModelgenBuilder, NamingStyle};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

fn config(src: PathBuf, dir: PathBuf) -> GeneratorConfig {
    GeneratorConfig {
        src,
        dir,
        cache: true,
        ..Default::default()
    }
}

#[test]
fn test_generate_from_tables_json() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("store");
    let config = config(fixture("tables.json"), dir.clone());

    let report = modelgen::generate_from_tables(&config).unwrap();
    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(
        report.written,
        vec![dir.join("accounts_model.rs"), dir.join("sessions_model.rs")]
    );

    let accounts = fs::read_to_string(dir.join("accounts_model.rs")).unwrap();
    assert!(accounts.contains("fn find_one_by_handle("));
    assert!(accounts.contains("//! Model for table `accounts` in module `store`."));

    let sessions = fs::read_to_string(dir.join("sessions_model.rs")).unwrap();
    assert!(!sessions.contains("find_one_by"));
    assert!(sessions.contains("async fn find_one(&self, token: &str)"));
    assert!(sessions.contains("use chrono::"));
}

#[test]
fn test_malformed_tables_json() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("tables.json");
    fs::write(&src, "{ \"users\": [ }").unwrap();

    let err = modelgen::generate_from_tables(&config(src, temp.path().join("model"))).unwrap_err();
    assert!(matches!(err, CodegenError::SerializationError(_)));
}

#[test]
fn test_table_filters() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("model");
    let mut config = config(fixture("schema.sql"), dir.clone());
    config.exclude_tables = "orders, tags".to_string();

    let report = modelgen::generate(&config).unwrap();
    assert_eq!(report.written, vec![dir.join("users_model.rs")]);
}

#[test]
fn test_package_override() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("model");
    let mut config = config(fixture("schema.sql"), dir.clone());
    config.package = Some("persistence".to_string());
    config.include_tables = "tags".to_string();

    modelgen::generate(&config).unwrap();
    let tags = fs::read_to_string(dir.join("tags_model.rs")).unwrap();
    assert!(tags.contains("in module `persistence`"));
}

#[test]
fn test_template_override() {
    let temp = TempDir::new().unwrap();
    let templates = temp.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("vars.tpl"),
        "//! Custom vars\npub const PACKAGE: &str = \"{{pkg}}\";\n",
    )
    .unwrap();

    let dir = temp.path().join("model");
    let mut config = config(fixture("schema.sql"), dir.clone());
    config.template_dir = Some(templates);

    let report = modelgen::generate(&config).unwrap();
    assert!(report.is_success());
    let vars = fs::read_to_string(dir.join("vars.rs")).unwrap();
    assert!(vars.contains("pub const PACKAGE: &str = \"model\";"));
}

#[test]
fn test_unknown_slot_fails_every_table() {
    let temp = TempDir::new().unwrap();
    let templates = temp.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("new.tpl"), "impl {{model_name}} { {{constructor}} }").unwrap();

    let dir = temp.path().join("model");
    let mut config = config(fixture("schema.sql"), dir.clone());
    config.template_dir = Some(templates);

    let report = modelgen::generate(&config).unwrap();
    assert_eq!(report.failures.len(), 3);
    for failure in &report.failures {
        match &failure.error {
            CodegenError::BindingError { template, reason } => {
                assert_eq!(template, "new.tpl");
                assert_eq!(reason, "unknown slot `constructor`");
            }
            other => panic!("unexpected error for {}: {other:?}", failure.table),
        }
    }
    assert!(report.written.is_empty());
    assert!(dir.join("vars.rs").exists());
}

#[test]
fn test_builder() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("model");

    let report = ModelgenBuilder::new(fixture("schema.sql"))
        .dir(&dir)
        .style(NamingStyle::Kebab)
        .cache(true)
        .include_tables(&["users", "tags"])
        .generate()
        .unwrap();

    assert_eq!(
        report.written,
        vec![dir.join("tags-model.rs"), dir.join("users-model.rs")]
    );
}

#[test]
fn test_builder_reports_table_failures() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("schema.sql");
    fs::write(
        &src,
        "CREATE TABLE ok (id INT PRIMARY KEY);\nCREATE TABLE nokey (label TEXT);",
    )
    .unwrap();

    let err = ModelgenBuilder::new(&src)
        .dir(temp.path().join("model"))
        .generate()
        .unwrap_err();
    assert!(matches!(err, CodegenError::ValidationError { .. }));
    assert!(temp.path().join("model").join("ok_model.rs").exists());
}

#[test]
fn test_builder_validates_source() {
    let temp = TempDir::new().unwrap();
    let err = ModelgenBuilder::new(temp.path().join("missing.sql"))
        .generate()
        .unwrap_err();
    assert!(matches!(err, CodegenError::ConfigError(_)));
}
