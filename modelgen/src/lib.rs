//! modelgen: Generate cached Rust data-access models from MySQL `CREATE TABLE` statements
//!
//! This crate provides both a CLI tool and a library. It parses SQL DDL using
//! `sqlparser-rs` and generates, per table, one model file containing:
//!
//! - A row struct with `#[derive(Serialize, Deserialize, rdbi::FromRow, rdbi::ToParams)]`
//! - A `<Table>Model` trait and a `Default<Table>Model<P: rdbi::Pool>` implementing it
//! - `insert`, `find_one`, `find_one_by_<unique key>`, `update` and `delete`
//!
//! With caching enabled, lookups read through a `ModelCache` keyed by
//! `cache:<table>:<columns>:<values>` and writes invalidate every key the
//! row may be cached under. A shared `vars.rs` with the error type, the cache
//! trait and the not-found placeholder is written next to the models.
//!
//! Model files are never overwritten once they exist; `vars.rs` always is.
//!
//! # Usage in build.rs
//!
//! ```rust,ignore
//! fn main() {
//!     modelgen::ModelgenBuilder::new("schema.sql")
//!         .dir("src/model")
//!         .cache(true)
//!         .generate()
//!         .expect("Failed to generate models");
//!
//!     println!("cargo:rerun-if-changed=schema.sql");
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! modelgen ddl --src schema.sql --dir ./src/model --cache
//! modelgen tables --src tables.json --dir ./src/model
//! modelgen inspect --src schema.sql
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod generator;
pub mod parser;
pub mod report;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use codegen::{NamingStyle, TemplateSet};
pub use config::GeneratorConfig;
pub use error::{CodegenError, Result};
pub use generator::{
    GenerationReport, Generator, GeneratorOptions, TableFailure, TableFilter,
};
pub use parser::Table;
pub use report::{Reporter, TracingReporter};

/// Generate models for every table of the DDL file `config.src`
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport> {
    let generator = generator_for(config)?;
    info!(
        "Generating models from {} into {}",
        config.src.display(),
        generator.dir().display()
    );
    generator.start_from_ddl(&config.src, config.cache)
}

/// Generate models for the tables of the JSON file `config.src`
pub fn generate_from_tables(config: &GeneratorConfig) -> Result<GenerationReport> {
    let tables = load_tables(&config.src)?;
    let generator = generator_for(config)?;
    info!(
        "Generating models for {} parsed tables into {}",
        tables.len(),
        generator.dir().display()
    );
    generator.start_from_tables(tables, config.cache)
}

/// Read a JSON object of table name to [`Table`]
pub fn load_tables(path: &Path) -> Result<BTreeMap<String, Table>> {
    let content = std::fs::read_to_string(path)?;
    let tables: BTreeMap<String, Table> = serde_json::from_str(&content)?;
    debug!("Loaded {} tables from {}", tables.len(), path.display());
    Ok(tables)
}

/// Template set of a run: built-ins, overridden from `template_dir` when set
pub fn load_templates(template_dir: Option<&Path>) -> Result<TemplateSet> {
    match template_dir {
        Some(dir) => TemplateSet::load(dir),
        None => Ok(TemplateSet::builtin()),
    }
}

fn generator_for(config: &GeneratorConfig) -> Result<Generator> {
    let templates = load_templates(config.template_dir.as_deref())?;
    let mut options = GeneratorOptions::default().filter(TableFilter::new(
        &config.include_tables,
        &config.exclude_tables,
    ));
    if let Some(package) = &config.package {
        options = options.package(package.clone());
    }
    Generator::new(&config.dir, config.style, templates, options)
}

/// Builder pattern for easy configuration in build.rs
pub struct ModelgenBuilder {
    config: GeneratorConfig,
}

impl ModelgenBuilder {
    /// Create a new builder reading DDL from `src`
    pub fn new(src: impl AsRef<Path>) -> Self {
        Self {
            config: GeneratorConfig::default_with_src(src.as_ref().to_path_buf()),
        }
    }

    /// Set the destination directory
    pub fn dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the file naming style
    pub fn style(mut self, style: NamingStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Generate cached models
    pub fn cache(mut self, cache: bool) -> Self {
        self.config.cache = cache;
        self
    }

    /// Set the package name instead of deriving it from the directory
    pub fn package(mut self, package: &str) -> Self {
        self.config.package = Some(package.to_string());
        self
    }

    /// Override built-in templates from a directory
    pub fn template_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.template_dir = Some(PathBuf::from(dir.as_ref()));
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Access the resulting configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the models; the first table failure, if any, is returned as the error
    pub fn generate(self) -> Result<GenerationReport> {
        self.config.validate()?;
        let mut report = generate(&self.config)?;
        if report.failures.is_empty() {
            return Ok(report);
        }
        warn!("{} tables failed", report.failures.len());
        Err(report.failures.swap_remove(0).error)
    }
}
