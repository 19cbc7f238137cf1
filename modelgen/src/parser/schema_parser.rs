//! `CREATE TABLE` parser using sqlparser-rs

use sqlparser::ast::{
    ColumnDef, ColumnOption, CreateTable, Expr, IndexColumn, ObjectName, PrimaryKeyConstraint,
    Statement, TableConstraint, UniqueConstraint,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use super::metadata::*;
use super::splitter::{split_statements, statement_label};
use crate::error::{CodegenError, Result};

/// Parse a single `CREATE TABLE` statement into table metadata.
///
/// The text may carry trailing statements (e.g. a `DROP TABLE` left between
/// two definitions by the splitter); exactly one of the statements must be a
/// `CREATE TABLE`.
pub fn parse_table(ddl: &str) -> Result<Table> {
    let label = statement_label(ddl);
    let statements = Parser::parse_sql(&MySqlDialect {}, ddl)
        .map_err(|e| CodegenError::parse(label.clone(), e))?;

    let mut tables = Vec::new();
    for stmt in statements {
        if let Statement::CreateTable(create_table) = stmt {
            tables.push(extract_table(&create_table).map_err(|reason| {
                CodegenError::parse(label.clone(), reason)
            })?);
        }
    }

    match tables.len() {
        1 => Ok(tables.remove(0)),
        0 => Err(CodegenError::parse(label, "no CREATE TABLE statement found")),
        n => Err(CodegenError::parse(
            label,
            format!("expected a single CREATE TABLE statement, found {}", n),
        )),
    }
}

/// Parse every `CREATE TABLE` in a script, in textual order.
///
/// Fails on the first statement that cannot be parsed; batch generation goes
/// through [`split_statements`] and [`parse_table`] instead so that one bad
/// statement does not hide the others.
pub fn parse_schema(sql: &str) -> Result<Vec<Table>> {
    let mut statements = split_statements(sql);
    statements.reverse();
    statements.into_iter().map(parse_table).collect()
}

/// One column definition plus its inline key markers
struct ColumnDecl {
    column: Column,
    primary: bool,
    unique: bool,
}

fn extract_table(create: &CreateTable) -> std::result::Result<Table, String> {
    let name = object_name(&create.name);

    let mut columns = Vec::with_capacity(create.columns.len());
    let mut unique_keys = Vec::new();
    let mut pk_columns: Vec<String> = Vec::new();

    for decl in create.columns.iter().map(column_decl) {
        if decl.primary {
            pk_columns.push(decl.column.name.clone());
        }
        if decl.unique {
            unique_keys.push(UniqueKey {
                name: format!("{}_unique", decl.column.name),
                columns: vec![decl.column.name.clone()],
            });
        }
        columns.push(decl.column);
    }

    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey(PrimaryKeyConstraint { columns: keyed, .. }) => {
                pk_columns = keyed.iter().map(index_column_name).collect();
            }
            TableConstraint::Unique(UniqueConstraint {
                columns: keyed,
                name: index_name,
                ..
            }) => {
                let keyed: Vec<String> = keyed.iter().map(index_column_name).collect();
                unique_keys.push(UniqueKey {
                    name: index_name
                        .as_ref()
                        .map(|ident| ident.value.clone())
                        .unwrap_or_else(|| format!("{}_unique", keyed.join("_"))),
                    columns: keyed,
                });
            }
            _ => {}
        }
    }

    if pk_columns.len() > 1 {
        return Err(format!(
            "table `{}` has a composite primary key ({}), only single-column primary keys are supported",
            name,
            pk_columns.join(", ")
        ));
    }
    let primary_key = pk_columns.pop().map(|column| PrimaryKey { column });

    if let Some(pk) = &primary_key {
        if let Some(col) = columns.iter_mut().find(|c| c.name == pk.column) {
            col.nullable = false;
        }
        // a unique key on exactly the primary key adds no lookup path
        unique_keys.retain(|uk| uk.columns != [pk.column.as_str()]);
    }

    Ok(Table {
        name,
        columns,
        primary_key,
        unique_keys,
    })
}

fn column_decl(def: &ColumnDef) -> ColumnDecl {
    let data_type = def.data_type.to_string();
    let mut decl = ColumnDecl {
        column: Column {
            name: def.name.value.clone(),
            is_unsigned: data_type.to_ascii_uppercase().contains("UNSIGNED"),
            data_type,
            nullable: true,
            default_value: None,
            is_auto_increment: false,
            comment: None,
        },
        primary: false,
        unique: false,
    };

    for option in def.options.iter().map(|o| &o.option) {
        let column = &mut decl.column;
        match option {
            ColumnOption::NotNull => column.nullable = false,
            ColumnOption::Null => column.nullable = true,
            ColumnOption::Default(expr) => column.default_value = Some(expr.to_string()),
            ColumnOption::Comment(text) => column.comment = Some(text.clone()),
            ColumnOption::PrimaryKey(_) => {
                column.nullable = false;
                decl.primary = true;
            }
            ColumnOption::Unique(_) => decl.unique = true,
            // MySQL's AUTO_INCREMENT is kept as raw dialect tokens
            ColumnOption::DialectSpecific(tokens) => {
                if tokens
                    .iter()
                    .any(|t| t.to_string().eq_ignore_ascii_case("AUTO_INCREMENT"))
                {
                    column.is_auto_increment = true;
                }
            }
            _ => {}
        }
    }

    decl
}

/// Last part of a possibly schema-qualified name
fn object_name(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

fn index_column_name(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_table() {
        let sql = r#"
            CREATE TABLE users (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                username VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL
            );
        "#;

        let table = parse_table(sql).unwrap();
        assert_eq!(table.name, "users");
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.primary_key.as_ref().unwrap().column, "id");
        assert!(table.columns[0].is_auto_increment);
        assert!(table.unique_keys.is_empty());
    }

    #[test]
    fn test_parse_unique_keys() {
        let sql = r#"
            CREATE TABLE `user` (
                `id` BIGINT NOT NULL AUTO_INCREMENT,
                `mobile` VARCHAR(32) NOT NULL UNIQUE,
                `name` VARCHAR(64) NOT NULL,
                `org_id` BIGINT NOT NULL,
                PRIMARY KEY (`id`),
                UNIQUE KEY `uk_org_name` (`org_id`, `name`),
                KEY `idx_name` (`name`)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;
        "#;

        let table = parse_table(sql).unwrap();
        assert_eq!(table.primary_key.as_ref().unwrap().column, "id");
        assert_eq!(table.unique_keys.len(), 2);
        assert_eq!(table.unique_keys[0].columns, vec!["mobile"]);
        assert_eq!(table.unique_keys[1].name, "uk_org_name");
        assert_eq!(table.unique_keys[1].columns, vec!["org_id", "name"]);
    }

    #[test]
    fn test_missing_primary_key_is_not_a_parse_error() {
        let table = parse_table("CREATE TABLE logs (message TEXT)").unwrap();
        assert!(table.primary_key.is_none());
    }

    #[test]
    fn test_composite_primary_key_rejected() {
        let sql = r#"
            CREATE TABLE order_items (
                order_id BIGINT NOT NULL,
                product_id BIGINT NOT NULL,
                PRIMARY KEY (order_id, product_id)
            );
        "#;

        let err = parse_table(sql).unwrap_err();
        match err {
            CodegenError::ParseError { statement, reason } => {
                assert_eq!(statement, "statement `order_items`");
                assert!(reason.contains("composite primary key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_statement() {
        let err = parse_table("CREATE TABLE broken (id BIGINT PRIMARY KEY,,)").unwrap_err();
        assert!(matches!(err, CodegenError::ParseError { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_unique_on_primary_key_dropped() {
        let sql = "CREATE TABLE t (id BIGINT PRIMARY KEY, UNIQUE KEY uk_id (id))";
        let table = parse_table(sql).unwrap();
        assert!(table.unique_keys.is_empty());
    }

    #[test]
    fn test_parse_schema_textual_order() {
        let sql = "CREATE TABLE a (id INT PRIMARY KEY); CREATE TABLE b (id INT PRIMARY KEY);";
        let tables = parse_schema(sql).unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
