//! Configuration settings for modelgen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::codegen::NamingStyle;
use crate::error::{CodegenError, Result};

/// Main configuration struct for a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// DDL file, or a JSON file of parsed tables for `tables` runs
    #[serde(default)]
    pub src: PathBuf,

    /// Destination directory of generated models
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// File naming style (gozero, go_zero, go-zero, GoZero, goZero); `go_zero` when unset
    #[serde(default)]
    pub style: NamingStyle,

    /// Generate cached models
    #[serde(default = "default_cache")]
    pub cache: bool,

    /// Package name; defaults to the base name of `dir`
    #[serde(default)]
    pub package: Option<String>,

    /// Directory of template overrides
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_dir() -> PathBuf {
    PathBuf::from(defaults::DIR)
}
fn default_cache() -> bool {
    defaults::CACHE
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            src: PathBuf::new(),
            dir: default_dir(),
            style: NamingStyle::default(),
            cache: default_cache(),
            package: None,
            template_dir: None,
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            log_level: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a default config reading from `src`
    pub fn default_with_src(src: PathBuf) -> Self {
        Self {
            src,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // MODELGEN_TEMPLATE_DIR -> template_dir
        builder = builder.add_source(Environment::with_prefix(defaults::ENV_PREFIX).try_parsing(true));

        let config: GeneratorConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.src.as_os_str().is_empty() {
            return Err(CodegenError::ConfigError("src is required".into()));
        }

        if !self.src.exists() {
            return Err(CodegenError::ConfigError(format!(
                "Source file not found: {}",
                self.src.display()
            )));
        }

        if self.dir.as_os_str().is_empty() {
            return Err(CodegenError::ConfigError("dir is required".into()));
        }

        if let Some(dir) = &self.template_dir {
            if !dir.is_dir() {
                return Err(CodegenError::ConfigError(format!(
                    "Template directory not found: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.include_tables, "*");
        assert_eq!(config.style, NamingStyle::Snake);
        assert!(!config.cache);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_validation_missing_src() {
        let config = GeneratorConfig::default();
        assert!(matches!(
            config.validate(),
            Err(CodegenError::ConfigError(_))
        ));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
            src = "schema.sql"
            dir = "internal/model"
            style = "GoZero"
            cache = true
            log_level = "debug"
        "#;
        let config: GeneratorConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.style, NamingStyle::Pascal);
        assert!(config.cache);
        assert_eq!(config.dir, PathBuf::from("internal/model"));
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_unset_style_is_go_zero() {
        let config: GeneratorConfig = toml::from_str("src = \"schema.sql\"").unwrap();
        assert_eq!(config.style, NamingStyle::Snake);
        assert_eq!(config.style.to_string(), "go_zero");
    }

    #[test]
    fn test_invalid_style_rejected() {
        let result: std::result::Result<GeneratorConfig, _> = toml::from_str("style = \"GO_ZERO\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modelgen.toml");
        std::fs::write(&path, "src = \"schema.sql\"\ncache = true\n").unwrap();

        let config = GeneratorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.src, PathBuf::from("schema.sql"));
        assert!(config.cache);
        assert_eq!(config.dir, PathBuf::from("."));
    }
}
