//! Generation sessions: DDL or parsed tables in, model files out

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codegen::{
    gen_model, gen_vars_file, model_file_name, ModelWriter, NamingStyle, TemplateSet, WriteResult,
};
use crate::error::{CodegenError, Result};
use crate::parser::{parse_table, split_statements, statement_table_name, Table};
use crate::report::{Reporter, TracingReporter};

/// Include / exclude lists of table names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    /// `None` includes every table
    include: Option<HashSet<String>>,
    exclude: HashSet<String>,
}

impl TableFilter {
    /// Build from comma-separated lists; `*` or an empty include list means all tables
    pub fn new(include: &str, exclude: &str) -> Self {
        let include = match include.trim() {
            "" | "*" => None,
            list => Some(split_list(list)),
        };
        Self {
            include,
            exclude: split_list(exclude),
        }
    }

    pub fn matches(&self, table: &str) -> bool {
        let included = self.include.as_ref().map_or(true, |set| set.contains(table));
        included && !self.exclude.contains(table)
    }
}

fn split_list(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Optional settings of a [`Generator`]
pub struct GeneratorOptions {
    /// Receives progress messages; defaults to [`TracingReporter`]
    pub reporter: Box<dyn Reporter>,

    /// Package name used in generated docs instead of the destination's base name
    pub package_override: Option<String>,

    /// Tables to generate; all by default
    pub filter: TableFilter,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            reporter: Box::new(TracingReporter),
            package_override: None,
            filter: TableFilter::default(),
        }
    }
}

impl GeneratorOptions {
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package_override = Some(package.into());
        self
    }

    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// A table (or statement) that could not be generated
#[derive(Debug)]
pub struct TableFailure {
    pub table: String,
    pub error: CodegenError,
}

impl fmt::Display for TableFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.table, self.error)
    }
}

/// Outcome of one generation run
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Model files written by this run
    pub written: Vec<PathBuf>,

    /// Model files left untouched because they already existed
    pub skipped: Vec<PathBuf>,

    /// The shared declarations file, rewritten on every run
    pub vars_file: Option<PathBuf>,

    pub failures: Vec<TableFailure>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One generation session bound to a destination directory
pub struct Generator {
    dir: PathBuf,
    pkg: String,
    style: NamingStyle,
    templates: TemplateSet,
    reporter: Box<dyn Reporter>,
    filter: TableFilter,
}

impl Generator {
    /// Create a session writing into `dir`.
    ///
    /// Relative directories are resolved against the working directory. The
    /// package name is the directory's base name unless overridden.
    pub fn new(
        dir: impl AsRef<Path>,
        style: NamingStyle,
        templates: TemplateSet,
        options: GeneratorOptions,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(dir)
        };

        let pkg = match options.package_override {
            Some(pkg) => pkg,
            None => dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    CodegenError::ConfigError(format!(
                        "cannot derive a package name from {}",
                        dir.display()
                    ))
                })?,
        };

        Ok(Self {
            dir,
            pkg,
            style,
            templates,
            reporter: options.reporter,
            filter: options.filter,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn package(&self) -> &str {
        &self.pkg
    }

    /// Generate models for every `CREATE TABLE` in a DDL file
    pub fn start_from_ddl(&self, src: &Path, with_cache: bool) -> Result<GenerationReport> {
        info!("Reading DDL from {}", src.display());
        let sql = fs::read_to_string(src)?;
        self.start_from_sql(&sql, with_cache)
    }

    /// Generate models for every `CREATE TABLE` in a DDL script.
    ///
    /// A statement that fails to parse is recorded in the report and the
    /// remaining statements are still generated.
    pub fn start_from_sql(&self, sql: &str, with_cache: bool) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        let mut tables = BTreeMap::new();

        // Statements come last to first, so the first definition of a name wins
        for statement in split_statements(sql) {
            match parse_table(statement) {
                Ok(table) => {
                    if let Some(previous) = tables.insert(table.name.clone(), table) {
                        debug!("Table {} is defined more than once", previous.name);
                    }
                }
                Err(e) => {
                    let name = statement_table_name(statement)
                        .unwrap_or_else(|| "<unnamed>".to_string());
                    if self.filter.matches(&name) {
                        self.fail(&mut report, name, e);
                    }
                }
            }
        }
        debug!("Parsed {} tables from DDL", tables.len());

        self.generate(tables, with_cache, report)
    }

    /// Generate models for already-parsed tables, in name order
    pub fn start_from_tables(
        &self,
        tables: BTreeMap<String, Table>,
        with_cache: bool,
    ) -> Result<GenerationReport> {
        self.generate(tables, with_cache, GenerationReport::default())
    }

    fn generate(
        &self,
        tables: BTreeMap<String, Table>,
        with_cache: bool,
        mut report: GenerationReport,
    ) -> Result<GenerationReport> {
        let total = tables.len();
        let tables: BTreeMap<String, Table> = tables
            .into_iter()
            .filter(|(name, _)| self.filter.matches(name))
            .collect();
        if tables.len() != total {
            debug!("Filtered out {} tables", total - tables.len());
        }

        let writer = ModelWriter::new(&self.dir, self.style, self.reporter.as_ref());
        writer.prepare()?;
        self.reporter.info(&format!(
            "Generating {} models into {} (cache: {})",
            tables.len(),
            self.dir.display(),
            with_cache
        ));

        for (name, table) in &tables {
            let code = match gen_model(table, with_cache, &self.templates, &self.pkg) {
                Ok(code) => code,
                Err(e) => {
                    self.fail(&mut report, name.clone(), e);
                    continue;
                }
            };

            let path = self.dir.join(model_file_name(self.style, &table.name));
            match writer.write_model(&table.name, &code) {
                Ok(WriteResult::Written) => report.written.push(path),
                Ok(WriteResult::Skipped) => report.skipped.push(path),
                Err(e) => self.fail(&mut report, name.clone(), e),
            }
        }

        let vars = gen_vars_file(&self.templates, &self.pkg)?;
        report.vars_file = Some(writer.write_vars(&vars)?);

        if report.is_success() {
            self.reporter.success("Done.");
        } else {
            self.reporter.warning(&format!(
                "Done with {} failed table(s)",
                report.failures.len()
            ));
        }
        Ok(report)
    }

    fn fail(&self, report: &mut GenerationReport, table: String, error: CodegenError) {
        self.reporter.warning(&format!("{}: {}", table, error));
        report.failures.push(TableFailure { table, error });
    }
}
