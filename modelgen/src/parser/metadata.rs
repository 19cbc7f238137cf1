//! Metadata structures for parsed table definitions

use serde::{Deserialize, Serialize};

use crate::codegen::TypeResolver;

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name as written in the DDL
    pub name: String,

    /// Columns in declaration order
    pub columns: Vec<Column>,

    /// Primary key (if any)
    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,

    /// Unique keys other than the primary key, in declaration order
    #[serde(default)]
    pub unique_keys: Vec<UniqueKey>,
}

/// Metadata for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Data type as string (e.g., "BIGINT", "VARCHAR(255)")
    pub data_type: String,

    /// Whether the column is nullable
    #[serde(default)]
    pub nullable: bool,

    /// Default value expression (if any)
    #[serde(default)]
    pub default_value: Option<String>,

    /// Whether this column is auto-increment
    #[serde(default)]
    pub is_auto_increment: bool,

    /// Whether this column is unsigned (for numeric types)
    #[serde(default)]
    pub is_unsigned: bool,

    /// Column comment (if any)
    #[serde(default)]
    pub comment: Option<String>,
}

/// Single-column primary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub column: String,
}

/// Unique key (single or multi column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    /// Index name
    pub name: String,

    /// Columns in the index (in order)
    pub columns: Vec<String>,
}

impl Table {
    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The primary key column, if declared and present in the column list
    pub fn primary_column(&self) -> Option<&Column> {
        self.primary_key
            .as_ref()
            .and_then(|pk| self.get_column(&pk.column))
    }

    /// Check if a column is the primary key
    pub fn is_primary_key_column(&self, column_name: &str) -> bool {
        self.primary_key
            .as_ref()
            .map(|pk| pk.column == column_name)
            .unwrap_or(false)
    }

    /// True if any column maps to a date or time type
    pub fn contains_temporal_column(&self) -> bool {
        self.columns
            .iter()
            .any(|c| TypeResolver::resolve(c).needs_chrono())
    }
}
