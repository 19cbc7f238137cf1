use super::{Fragment, ModelContext};
use crate::codegen::writer::VARS_MODULE;

/// `use` declarations of a model file.
///
/// Must stay a superset of what the other fragments reference: the cache
/// handle (`Arc`, `ModelCache`) and the not-found placeholder only appear in
/// cached models, `chrono` only when a column is temporal.
pub fn gen_imports(ctx: &ModelContext<'_>, with_cache: bool) -> Fragment {
    let mut code = String::new();

    if with_cache {
        code.push_str("use std::sync::Arc;\n\n");
    }

    code.push_str("use rdbi::{Pool, Query};\n");
    code.push_str("use serde::{Deserialize, Serialize};\n");

    if ctx.table.contains_temporal_column() {
        code.push_str("#[allow(unused_imports)]\n");
        code.push_str("use chrono::{NaiveDate, NaiveDateTime, NaiveTime};\n");
    }

    code.push('\n');
    let shared = if with_cache {
        "ModelCache, ModelError, ModelResult, CACHE_NOT_FOUND_PLACEHOLDER"
    } else {
        "ModelError, ModelResult"
    };
    code.push_str(&format!("use super::{}::{{{}}};\n", VARS_MODULE, shared));

    Fragment::code(code)
}
