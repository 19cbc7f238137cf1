//! Error types for modelgen

use thiserror::Error;

/// Result type alias for modelgen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    /// A DDL statement could not be turned into a table description
    #[error("Failed to parse {statement}: {reason}")]
    ParseError { statement: String, reason: String },

    /// A table is structurally unusable for model generation
    #[error("Table `{table}`: {reason}")]
    ValidationError { table: String, reason: String },

    /// A template could not be bound or its output is not valid Rust
    #[error("Template `{template}`: {reason}")]
    BindingError { template: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CodegenError {
    pub(crate) fn parse(statement: impl Into<String>, reason: impl ToString) -> Self {
        CodegenError::ParseError {
            statement: statement.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn validation(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CodegenError::ValidationError {
            table: table.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn binding(template: impl Into<String>, reason: impl ToString) -> Self {
        CodegenError::BindingError {
            template: template.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<sqlparser::parser::ParserError> for CodegenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        CodegenError::parse("schema", err)
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
