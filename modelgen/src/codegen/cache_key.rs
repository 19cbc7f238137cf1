//! Cache key derivation from a table's primary and unique keys

use heck::ToShoutySnakeCase;
use tracing::debug;

use super::naming::{dedupe_name, generate_find_one_by_method_name, to_const_name};
use crate::error::{CodegenError, Result};
use crate::parser::Table;

/// One cache lookup path: the primary key or a unique key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    /// Key columns in declaration order
    pub columns: Vec<String>,

    /// Name of the generated const holding [`prefix`](Self::prefix)
    pub const_name: String,

    /// Canonical key template, e.g. `cache:users:email:`.
    /// The runtime key is the prefix followed by the column values joined by `:`.
    pub prefix: String,

    /// Name of the generated lookup method for this key
    pub method_name: String,
}

impl CacheKey {
    /// Rust expression building the runtime cache key.
    ///
    /// `values` holds one `(expression, format spec)` pair per key column.
    pub fn key_expr(&self, values: &[(String, &'static str)]) -> String {
        let specs: Vec<&str> = values.iter().map(|(_, spec)| *spec).collect();
        let args: Vec<&str> = values.iter().map(|(expr, _)| expr.as_str()).collect();
        format!(
            "format!(\"{{}}{}\", {}, {})",
            specs.join(":"),
            self.const_name,
            args.join(", ")
        )
    }
}

/// Cache keys derived for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeySpec {
    pub primary: CacheKey,

    /// One entry per distinct unique key, in declaration order
    pub unique: Vec<CacheKey>,
}

impl CacheKeySpec {
    /// Whether find-by-unique-field code is generated at all
    pub fn has_unique_cache_key(&self) -> bool {
        !self.unique.is_empty()
    }

    /// Primary key first, then unique keys
    pub fn all(&self) -> impl Iterator<Item = &CacheKey> {
        std::iter::once(&self.primary).chain(self.unique.iter())
    }
}

/// Derive the cache keys of a table.
///
/// Fails with a validation error when the table has no primary key or a key
/// references a column the table does not declare. Key prefixes embed the
/// table name, so tables sharing a column name never share a prefix.
pub fn derive_cache_keys(table: &Table) -> Result<CacheKeySpec> {
    let pk = table
        .primary_key
        .as_ref()
        .ok_or_else(|| CodegenError::validation(&table.name, "missing primary key"))?;
    if table.get_column(&pk.column).is_none() {
        return Err(CodegenError::validation(
            &table.name,
            format!("primary key column `{}` is not declared", pk.column),
        ));
    }

    let table_const = to_const_name(&table.name);
    let mut used_consts = Vec::new();
    let mut used_methods = vec!["insert".to_string(), "update".to_string(), "delete".to_string()];

    let primary_columns = vec![pk.column.clone()];
    let primary = build_key(
        table,
        &table_const,
        primary_columns,
        "find_one".to_string(),
        &mut used_consts,
        &mut used_methods,
    );

    let mut unique: Vec<CacheKey> = Vec::new();
    for uk in &table.unique_keys {
        if let Some(missing) = uk.columns.iter().find(|c| table.get_column(c).is_none()) {
            return Err(CodegenError::validation(
                &table.name,
                format!("unique key `{}` references undeclared column `{}`", uk.name, missing),
            ));
        }
        if uk.columns.is_empty()
            || uk.columns == primary.columns
            || unique.iter().any(|k| k.columns == uk.columns)
        {
            debug!("Skipping duplicate unique key {} on {}", uk.name, table.name);
            continue;
        }

        let method_name = generate_find_one_by_method_name(&uk.columns);
        unique.push(build_key(
            table,
            &table_const,
            uk.columns.clone(),
            method_name,
            &mut used_consts,
            &mut used_methods,
        ));
    }

    Ok(CacheKeySpec { primary, unique })
}

fn build_key(
    table: &Table,
    table_const: &str,
    columns: Vec<String>,
    method_name: String,
    used_consts: &mut Vec<String>,
    used_methods: &mut Vec<String>,
) -> CacheKey {
    let column_part = columns
        .iter()
        .map(|c| c.to_shouty_snake_case())
        .collect::<Vec<_>>()
        .join("_");
    let const_name = dedupe_name(
        format!("CACHE_{}_{}_PREFIX", table_const, column_part),
        used_consts,
    );
    let prefix = format!("cache:{}:{}:", table.name, columns.join(":"));
    let method_name = dedupe_name(method_name, used_methods);

    CacheKey {
        columns,
        const_name,
        prefix,
        method_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;

    #[test]
    fn test_primary_and_unique_keys() {
        let table = parse_table(
            "CREATE TABLE users (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                email VARCHAR(255) NOT NULL UNIQUE,
                org_id BIGINT NOT NULL,
                name VARCHAR(64) NOT NULL,
                UNIQUE KEY uk_org_name (org_id, name)
            )",
        )
        .unwrap();

        let keys = derive_cache_keys(&table).unwrap();
        assert_eq!(keys.primary.prefix, "cache:users:id:");
        assert_eq!(keys.primary.const_name, "CACHE_USERS_ID_PREFIX");
        assert_eq!(keys.primary.method_name, "find_one");

        assert!(keys.has_unique_cache_key());
        assert_eq!(keys.unique.len(), 2);
        assert_eq!(keys.unique[0].prefix, "cache:users:email:");
        assert_eq!(keys.unique[0].method_name, "find_one_by_email");
        assert_eq!(keys.unique[1].prefix, "cache:users:org_id:name:");
        assert_eq!(keys.unique[1].const_name, "CACHE_USERS_ORG_ID_NAME_PREFIX");
        assert_eq!(keys.unique[1].method_name, "find_one_by_org_id_and_name");
    }

    #[test]
    fn test_missing_primary_key() {
        let table = parse_table("CREATE TABLE logs (message TEXT)").unwrap();
        let err = derive_cache_keys(&table).unwrap_err();
        match err {
            CodegenError::ValidationError { table, reason } => {
                assert_eq!(table, "logs");
                assert_eq!(reason, "missing primary key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_deterministic() {
        let sql = "CREATE TABLE t (id INT PRIMARY KEY, a INT UNIQUE, b INT, UNIQUE KEY uk_b (b))";
        let first = derive_cache_keys(&parse_table(sql).unwrap()).unwrap();
        let second = derive_cache_keys(&parse_table(sql).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_across_tables() {
        let a = parse_table("CREATE TABLE a (id INT PRIMARY KEY)").unwrap();
        let b = parse_table("CREATE TABLE b (id INT PRIMARY KEY)").unwrap();
        let ka = derive_cache_keys(&a).unwrap();
        let kb = derive_cache_keys(&b).unwrap();
        assert_ne!(ka.primary.prefix, kb.primary.prefix);
        assert_ne!(ka.primary.const_name, kb.primary.const_name);
    }

    #[test]
    fn test_duplicate_unique_groups_collapse() {
        let table = parse_table(
            "CREATE TABLE t (
                id INT PRIMARY KEY,
                code VARCHAR(8) NOT NULL UNIQUE,
                UNIQUE KEY uk_code (code)
            )",
        )
        .unwrap();
        let keys = derive_cache_keys(&table).unwrap();
        assert_eq!(keys.unique.len(), 1);
    }

    #[test]
    fn test_colliding_names_are_suffixed() {
        let table = parse_table(
            "CREATE TABLE t (
                id INT PRIMARY KEY,
                a_and_b INT NOT NULL UNIQUE,
                a INT NOT NULL,
                b INT NOT NULL,
                UNIQUE KEY uk_ab (a, b)
            )",
        )
        .unwrap();
        let keys = derive_cache_keys(&table).unwrap();
        assert_eq!(keys.unique[0].method_name, "find_one_by_a_and_b");
        assert_eq!(keys.unique[1].method_name, "find_one_by_a_and_b2");
        assert_ne!(keys.unique[0].prefix, keys.unique[1].prefix);
    }

    #[test]
    fn test_key_expr() {
        let table = parse_table(
            "CREATE TABLE t (id INT PRIMARY KEY, a INT NOT NULL, b VARCHAR(8) NOT NULL, UNIQUE KEY uk_ab (a, b))",
        )
        .unwrap();
        let keys = derive_cache_keys(&table).unwrap();
        let expr = keys.unique[0].key_expr(&[("a".to_string(), "{}"), ("b".to_string(), "{}")]);
        assert_eq!(expr, "format!(\"{}{}:{}\", CACHE_T_A_B_PREFIX, a, b)");
    }
}
