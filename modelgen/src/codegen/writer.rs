//! Writes generated files to the destination directory

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::naming::NamingStyle;
use crate::error::Result;
use crate::report::Reporter;

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite (shared declarations)
    Always,
    /// Only create if the file doesn't exist (table models, which users may edit)
    IfMissing,
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was skipped (already exists)
    Skipped,
}

/// A generated file and its overwrite rule
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
    content: String,
    overwrite: Overwrite,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, overwrite: Overwrite) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            overwrite,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the file according to its overwrite rule
    pub fn write(&self) -> Result<WriteResult> {
        if self.overwrite == Overwrite::IfMissing && self.path.exists() {
            return Ok(WriteResult::Skipped);
        }
        write_file(&self.path, &self.content)?;
        Ok(WriteResult::Written)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// File name of a table's model, e.g. `user_info_model.rs`
pub fn model_file_name(style: NamingStyle, table: &str) -> String {
    format!("{}.rs", style.apply(&format!("{}_model", table)))
}

/// Module of the shared declarations, imported by every model as `super::vars`
pub const VARS_MODULE: &str = "vars";

/// File name of the shared declarations. Not subject to the naming style,
/// so it always matches the module path the models import.
pub fn vars_file_name() -> String {
    format!("{}.rs", VARS_MODULE)
}

/// Materializes the output of one generation run into a directory
pub struct ModelWriter<'a> {
    dir: &'a Path,
    style: NamingStyle,
    reporter: &'a dyn Reporter,
}

impl<'a> ModelWriter<'a> {
    pub fn new(dir: &'a Path, style: NamingStyle, reporter: &'a dyn Reporter) -> Self {
        Self {
            dir,
            style,
            reporter,
        }
    }

    /// Create the destination directory; succeeds when it already exists
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.dir)?;
        Ok(())
    }

    /// Write a table's model unless a file of the same name exists
    pub fn write_model(&self, table: &str, code: &str) -> Result<WriteResult> {
        let file = OutputFile::new(
            self.dir.join(model_file_name(self.style, table)),
            code,
            Overwrite::IfMissing,
        );
        let result = file.write()?;
        match result {
            WriteResult::Written => debug!("Wrote {}", file.path().display()),
            WriteResult::Skipped => self.reporter.warning(&format!(
                "{} already exists, ignored",
                file.path().display()
            )),
        }
        Ok(result)
    }

    /// Write the shared declarations, replacing any previous version
    pub fn write_vars(&self, code: &str) -> Result<PathBuf> {
        let file = OutputFile::new(
            self.dir.join(vars_file_name()),
            code,
            Overwrite::Always,
        );
        file.write()?;
        debug!("Wrote {}", file.path().display());
        Ok(file.path().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;

    #[derive(Default)]
    struct Warnings(Mutex<Vec<String>>);

    impl Reporter for Warnings {
        fn info(&self, _message: &str) {}

        fn warning(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }

        fn success(&self, _message: &str) {}
    }

    #[test]
    fn test_file_names() {
        assert_eq!(model_file_name(NamingStyle::Snake, "user_info"), "user_info_model.rs");
        assert_eq!(model_file_name(NamingStyle::Flat, "user_info"), "userinfomodel.rs");
        assert_eq!(model_file_name(NamingStyle::Pascal, "user_info"), "UserInfoModel.rs");
        assert_eq!(model_file_name(NamingStyle::Kebab, "user_info"), "user-info-model.rs");
        assert_eq!(vars_file_name(), "vars.rs");
    }

    #[test]
    fn test_if_missing_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.rs");
        fs::write(&path, "edited").unwrap();

        let file = OutputFile::new(&path, "generated", Overwrite::IfMissing);
        assert_eq!(file.write().unwrap(), WriteResult::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "edited");

        let file = OutputFile::new(&path, "generated", Overwrite::Always);
        assert_eq!(file.write().unwrap(), WriteResult::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "generated");
    }

    #[test]
    fn test_vars_file_ignores_naming_style() {
        let temp = TempDir::new().unwrap();
        let warnings = Warnings::default();
        let writer = ModelWriter::new(temp.path(), NamingStyle::Pascal, &warnings);

        assert_eq!(writer.write_model("users", "model").unwrap(), WriteResult::Written);
        assert_eq!(writer.write_vars("shared").unwrap(), temp.path().join("vars.rs"));
        assert!(temp.path().join("UsersModel.rs").is_file());
    }

    #[test]
    fn test_skip_is_reported() {
        let temp = TempDir::new().unwrap();
        let warnings = Warnings::default();
        let writer = ModelWriter::new(temp.path(), NamingStyle::Snake, &warnings);
        writer.prepare().unwrap();
        writer.prepare().unwrap();

        assert_eq!(writer.write_model("users", "first").unwrap(), WriteResult::Written);
        assert_eq!(writer.write_model("users", "second").unwrap(), WriteResult::Skipped);
        assert_eq!(
            fs::read_to_string(temp.path().join("users_model.rs")).unwrap(),
            "first"
        );
        assert_eq!(writer.write_vars("shared").unwrap(), temp.path().join("vars.rs"));

        let warnings = warnings.0.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].ends_with("users_model.rs already exists, ignored"));
    }
}
