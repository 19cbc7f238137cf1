//! MySQL column types as field types of generated models

use std::borrow::Cow;

use crate::parser::Column;

/// Field type of a generated model
#[derive(Debug, Clone, PartialEq)]
pub enum RustType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Bytes,
    Decimal,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Json,
    /// Nullable column
    Option(Box<RustType>),
}

impl RustType {
    fn optional(inner: RustType) -> Self {
        RustType::Option(Box::new(inner))
    }

    /// Path of a non-optional type as written in generated code
    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            RustType::Bool => "bool",
            RustType::I8 => "i8",
            RustType::I16 => "i16",
            RustType::I32 => "i32",
            RustType::I64 => "i64",
            RustType::U8 => "u8",
            RustType::U16 => "u16",
            RustType::U32 => "u32",
            RustType::U64 => "u64",
            RustType::F32 => "f32",
            RustType::F64 => "f64",
            RustType::String => "String",
            RustType::Bytes => "Vec<u8>",
            RustType::Decimal => "rust_decimal::Decimal",
            RustType::NaiveDate => "chrono::NaiveDate",
            RustType::NaiveDateTime => "chrono::NaiveDateTime",
            RustType::NaiveTime => "chrono::NaiveTime",
            RustType::Json => "serde_json::Value",
            RustType::Option(inner) => return Cow::Owned(format!("Option<{}>", inner.path())),
        })
    }

    /// Field type, e.g. `Option<chrono::NaiveDateTime>`
    pub fn to_type_string(&self) -> String {
        self.path().into_owned()
    }

    /// Parameter type of a lookup argument; owned text and bytes are borrowed
    pub fn to_param_type_string(&self) -> String {
        match self {
            RustType::String => "&str".to_string(),
            RustType::Bytes => "&[u8]".to_string(),
            RustType::Option(inner) if !inner.is_copy() && **inner != RustType::Json => {
                format!("Option<{}>", inner.to_param_type_string())
            }
            _ => self.to_type_string(),
        }
    }

    /// Whether the generated file names a `chrono` type
    pub fn needs_chrono(&self) -> bool {
        match self {
            RustType::Option(inner) => inner.needs_chrono(),
            other => matches!(
                other,
                RustType::NaiveDate | RustType::NaiveDateTime | RustType::NaiveTime
            ),
        }
    }

    /// `String`, `Vec<u8>` and `serde_json::Value` are the only non-`Copy` types
    pub fn is_copy(&self) -> bool {
        match self {
            RustType::Option(inner) => inner.is_copy(),
            other => !matches!(other, RustType::String | RustType::Bytes | RustType::Json),
        }
    }

    /// `.bind(..)` argument for a field of this type
    pub fn bind_expr(&self, expr: &str) -> String {
        if self.is_copy() {
            expr.to_string()
        } else {
            format!("&{}", expr)
        }
    }

    /// Expression passing an owned field of this type to a parameter of
    /// [`to_param_type_string`](Self::to_param_type_string) type
    pub fn pass_expr(&self, expr: &str) -> String {
        match self {
            _ if self.is_copy() => expr.to_string(),
            RustType::String | RustType::Bytes => format!("&{}", expr),
            RustType::Option(inner) if matches!(**inner, RustType::String | RustType::Bytes) => {
                format!("{}.as_deref()", expr)
            }
            _ => format!("{}.clone()", expr),
        }
    }

    /// Format spec used when rendering a value of this type into a cache key.
    ///
    /// Owned and borrowed forms of the same column (`String` / `&str`,
    /// `Option<String>` / `Option<&str>`) render identically under both specs.
    pub fn key_format_spec(&self) -> &'static str {
        match self {
            RustType::Option(_) | RustType::Bytes | RustType::Json => "{:?}",
            _ => "{}",
        }
    }
}

/// Maps a column's declared MySQL type to a [`RustType`]
pub struct TypeResolver;

impl TypeResolver {
    /// Field type of `column`, wrapped in `Option` when the column is nullable
    pub fn resolve(column: &Column) -> RustType {
        let base = Self::resolve_declared(&column.data_type, column.is_unsigned);
        if column.nullable {
            RustType::optional(base)
        } else {
            base
        }
    }

    /// Type of a declared type such as `INT(11) UNSIGNED` or `ENUM('a','b')`
    fn resolve_declared(data_type: &str, unsigned: bool) -> RustType {
        let (family, args) = split_declared(data_type);
        let int = |signed: RustType, wide: RustType| if unsigned { wide } else { signed };

        match family.as_str() {
            "bool" | "boolean" => RustType::Bool,
            "tinyint" if args == Some("1") => RustType::Bool,
            "bit" if args.is_none() || args == Some("1") => RustType::Bool,
            "tinyint" => int(RustType::I8, RustType::U8),
            "smallint" => int(RustType::I16, RustType::U16),
            "mediumint" | "int" | "integer" => int(RustType::I32, RustType::U32),
            "bigint" => int(RustType::I64, RustType::U64),
            "float" => RustType::F32,
            "double" | "real" => RustType::F64,
            "decimal" | "numeric" | "dec" | "fixed" => RustType::Decimal,
            "date" => RustType::NaiveDate,
            "datetime" | "timestamp" => RustType::NaiveDateTime,
            "time" => RustType::NaiveTime,
            "json" => RustType::Json,
            "bit" | "binary" | "varbinary" => RustType::Bytes,
            f if f.ends_with("blob") => RustType::Bytes,
            "geometry" | "point" | "linestring" | "polygon" | "geometrycollection" => {
                RustType::Bytes
            }
            f if f.starts_with("multi") => RustType::Bytes,
            // char, varchar, *text, enum, set, year and anything unknown
            _ => RustType::String,
        }
    }
}

/// Lowercased type family and the raw text between its parentheses
fn split_declared(data_type: &str) -> (String, Option<&str>) {
    let trimmed = data_type.trim();
    let family_end = trimmed
        .find(|c: char| c == '(' || c.is_whitespace())
        .unwrap_or(trimmed.len());
    let family = trimmed[..family_end].to_ascii_lowercase();

    let args = trimmed[family_end..]
        .trim_start()
        .strip_prefix('(')
        .and_then(|rest| rest.find(')').map(|end| rest[..end].trim()));

    (family, args)
}
