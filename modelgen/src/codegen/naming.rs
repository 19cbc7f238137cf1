//! Names of generated files, types, consts and methods

use std::fmt;
use std::str::FromStr;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

use crate::error::CodegenError;

/// File naming convention for generated files.
///
/// Styles are spelled with the sample words "go" and "zero", so the style
/// string itself shows the convention: `gozero`, `go_zero`, `go-zero`,
/// `GoZero`, `goZero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamingStyle {
    /// `usersmodel`
    Flat,
    /// `users_model`
    #[default]
    Snake,
    /// `users-model`
    Kebab,
    /// `UsersModel`
    Pascal,
    /// `usersModel`
    Camel,
}

impl NamingStyle {
    /// Convert an identifier to this naming convention
    pub fn apply(&self, name: &str) -> String {
        match self {
            NamingStyle::Flat => name.to_snake_case().replace('_', ""),
            NamingStyle::Snake => name.to_snake_case(),
            NamingStyle::Kebab => name.to_kebab_case(),
            NamingStyle::Pascal => name.to_pascal_case(),
            NamingStyle::Camel => name.to_lower_camel_case(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingStyle::Flat => "gozero",
            NamingStyle::Snake => "go_zero",
            NamingStyle::Kebab => "go-zero",
            NamingStyle::Pascal => "GoZero",
            NamingStyle::Camel => "goZero",
        }
    }
}

impl FromStr for NamingStyle {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gozero" => Ok(NamingStyle::Flat),
            "go_zero" => Ok(NamingStyle::Snake),
            "go-zero" => Ok(NamingStyle::Kebab),
            "GoZero" => Ok(NamingStyle::Pascal),
            "goZero" => Ok(NamingStyle::Camel),
            other => Err(CodegenError::ConfigError(format!(
                "unsupported naming style `{}` (expected one of gozero, go_zero, go-zero, GoZero, goZero)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for NamingStyle {
    type Error = CodegenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NamingStyle> for String {
    fn from(style: NamingStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a table name to a struct name (PascalCase)
pub fn to_struct_name(table_name: &str) -> String {
    table_name.to_pascal_case()
}

/// Convert a table name to the prefix of its module-level consts
/// e.g., "user_info" -> "USER_INFO"
pub fn to_const_name(table_name: &str) -> String {
    table_name.to_shouty_snake_case()
}

/// Generate a find_one_by method name for unique key columns
/// e.g., ["org_id", "name"] -> "find_one_by_org_id_and_name"
pub fn generate_find_one_by_method_name(columns: &[String]) -> String {
    let parts: Vec<String> = columns.iter().map(|c| c.to_snake_case()).collect();
    format!("find_one_by_{}", parts.join("_and_"))
}

/// Return `candidate`, or `candidate` with the smallest numeric suffix
/// (starting at 2) that is not yet in `used`. The result is recorded in `used`.
pub fn dedupe_name(candidate: String, used: &mut Vec<String>) -> String {
    let name = if used.contains(&candidate) {
        let mut counter = 2;
        loop {
            let next = format!("{}{}", candidate, counter);
            if !used.contains(&next) {
                break next;
            }
            counter += 1;
        }
    } else {
        candidate
    };
    used.push(name.clone());
    name
}

/// Strict and reserved keywords up to the 2024 edition, sorted
const RUST_KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: &[&str] = &["Self", "crate", "self", "super"];

pub fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.binary_search(&name).is_ok()
}

/// Snake-case field or parameter name for a column: `type` -> `r#type`, `self` -> `self_`
pub fn escape_field_name(name: &str) -> String {
    let snake = name.to_snake_case();
    if NON_RAW_KEYWORDS.contains(&snake.as_str()) {
        format!("{}_", snake)
    } else if is_rust_keyword(&snake) {
        format!("r#{}", snake)
    } else {
        snake
    }
}
