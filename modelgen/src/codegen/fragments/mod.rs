//! Fragment generators: each renders one piece of a model file
//!
//! Generators are pure functions of a [`ModelContext`] and the cache flag.
//! Operation generators also return the trait method they implement, rendered
//! from the same signature string as the implementation.

mod delete;
mod find_one;
mod find_one_by_field;
mod imports;
mod insert;
mod new;
mod types;
mod update;
mod vars;

pub use delete::gen_delete;
pub use find_one::gen_find_one;
pub use find_one_by_field::{gen_find_one_by_field, FindOneByFieldCode};
pub use imports::gen_imports;
pub use insert::gen_insert;
pub use new::gen_new;
pub use types::gen_types;
pub use update::gen_update;
pub use vars::gen_vars;

use super::cache_key::{CacheKey, CacheKeySpec};
use super::naming::{escape_field_name, to_struct_name};
use super::template::TemplateSet;
use super::type_resolver::{RustType, TypeResolver};
use crate::error::{CodegenError, Result};
use crate::parser::{Column, Table};

/// Generated code plus the trait method it contributes (if any)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub code: String,
    pub method: Option<String>,
}

impl Fragment {
    fn code(code: String) -> Self {
        Self { code, method: None }
    }

    /// Implementation and trait method rendered from one signature
    fn method(code: String, doc: &str, signature: &str) -> Self {
        Self {
            code,
            method: Some(format!("    /// {}\n    {};", doc, signature)),
        }
    }
}

/// Locals the built-in templates declare next to column-named parameters
const TEMPLATE_LOCALS: &[&str] = &["cached", "data", "key", "primary", "row"];

/// Everything the fragment generators read for one table
pub struct ModelContext<'a> {
    pub table: &'a Table,
    pub keys: &'a CacheKeySpec,
    pub templates: &'a TemplateSet,
    pub pkg: &'a str,
    pub struct_name: String,
    pub trait_name: String,
    pub model_name: String,
    pub primary: &'a Column,
    pub primary_type: RustType,
}

impl<'a> ModelContext<'a> {
    pub fn new(
        table: &'a Table,
        keys: &'a CacheKeySpec,
        templates: &'a TemplateSet,
        pkg: &'a str,
    ) -> Result<Self> {
        let primary = table.primary_column().ok_or_else(|| {
            CodegenError::validation(&table.name, "missing primary key")
        })?;
        let struct_name = to_struct_name(&table.name);

        Ok(Self {
            table,
            keys,
            templates,
            pkg,
            trait_name: format!("{}Model", struct_name),
            model_name: format!("Default{}Model", struct_name),
            struct_name,
            primary,
            primary_type: TypeResolver::resolve(primary),
        })
    }

    /// Backticked column list in declaration order
    pub fn select_fields(&self) -> String {
        backticked(self.table.columns.iter().map(|c| c.name.as_str()))
    }

    /// Columns written by insert (auto-increment columns are left to the database)
    pub fn insert_columns(&self) -> Vec<&'a Column> {
        self.table
            .columns
            .iter()
            .filter(|c| !c.is_auto_increment)
            .collect()
    }

    /// Columns written by update
    pub fn update_columns(&self) -> Vec<&'a Column> {
        self.table
            .columns
            .iter()
            .filter(|c| !self.table.is_primary_key_column(&c.name))
            .collect()
    }

    pub fn column_type(&self, name: &str) -> RustType {
        self.table
            .get_column(name)
            .map(TypeResolver::resolve)
            .unwrap_or(RustType::String)
    }

    /// Parameter name for a column: its field name, suffixed with `_` when
    /// that would shadow a template local (`key` -> `key_`)
    pub fn param_name(&self, column: &str) -> String {
        let name = escape_field_name(column);
        if TEMPLATE_LOCALS.contains(&name.as_str()) {
            format!("{}_", name)
        } else {
            name
        }
    }

    pub fn primary_param(&self) -> String {
        self.param_name(&self.primary.name)
    }

    /// Row struct field holding the primary key
    pub fn primary_field(&self) -> String {
        escape_field_name(&self.primary.name)
    }

    pub fn primary_param_type(&self) -> String {
        self.primary_type.to_param_type_string()
    }

    /// `name: type` parameter list for key columns
    pub fn param_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| {
                format!(
                    "{}: {}",
                    self.param_name(c),
                    self.column_type(c).to_param_type_string()
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Cache key expression of `key`, reading values from `source`
    /// (`Some("data")` -> `data.email`) or from the lookup parameters
    pub fn key_expr(&self, key: &CacheKey, source: Option<&str>) -> String {
        let values: Vec<(String, &'static str)> = key
            .columns
            .iter()
            .map(|c| {
                let expr = match source {
                    Some(source) => format!("{}.{}", source, escape_field_name(c)),
                    None => self.param_name(c),
                };
                (expr, self.column_type(c).key_format_spec())
            })
            .collect();
        key.key_expr(&values)
    }
}

/// `` `a`, `b` ``
pub(crate) fn backticked<'c>(names: impl Iterator<Item = &'c str>) -> String {
    names
        .map(|n| format!("`{}`", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `` `a` = ? AND `b` = ? ``
pub(crate) fn where_clause(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("`{}` = ?", c))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// One `.bind(expr)` line per expression
pub(crate) fn bind_lines(exprs: &[String]) -> String {
    exprs
        .iter()
        .map(|e| format!("            .bind({})", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `self.cache.del(&[...]);` for the given key expressions
pub(crate) fn cache_del(keys: &[String]) -> String {
    format!("        self.cache.del(&[{}]);", keys.join(", "))
}
