use super::{backticked, bind_lines, cache_del, Fragment, ModelContext};
use crate::codegen::naming::escape_field_name;
use crate::codegen::template::{bindings, TemplateKind};
use crate::codegen::type_resolver::TypeResolver;
use crate::error::Result;

bindings! {
    struct InsertBindings {
        signature,
        table,
        columns,
        placeholders,
        binds,
        invalidate,
    }
}

/// Single-row insert.
///
/// With caching, every key group (primary and unique) is invalidated after
/// the write: a not-found placeholder may be cached for any of them.
pub fn gen_insert(ctx: &ModelContext<'_>, with_cache: bool) -> Result<Fragment> {
    let insert_columns = ctx.insert_columns();
    let signature = format!(
        "async fn insert(&self, data: &{}) -> ModelResult<u64>",
        ctx.struct_name
    );

    let binds: Vec<String> = insert_columns
        .iter()
        .map(|c| TypeResolver::resolve(c).bind_expr(&format!("data.{}", escape_field_name(&c.name))))
        .collect();

    let invalidate = if with_cache {
        let primary = if ctx.primary.is_auto_increment {
            ctx.keys.primary.key_expr(&[("id".to_string(), "{}")])
        } else {
            ctx.key_expr(&ctx.keys.primary, Some("data"))
        };
        let mut keys = vec![primary];
        keys.extend(ctx.keys.unique.iter().map(|k| ctx.key_expr(k, Some("data"))));
        cache_del(&keys)
    } else {
        String::new()
    };

    let bindings = InsertBindings {
        signature: signature.clone(),
        table: ctx.table.name.clone(),
        columns: backticked(insert_columns.iter().map(|c| c.name.as_str())),
        placeholders: vec!["?"; insert_columns.len()].join(", "),
        binds: bind_lines(&binds),
        invalidate,
    };

    Ok(Fragment::method(
        ctx.templates.bind(TemplateKind::Insert, &bindings)?,
        "Insert one row, returning the auto-increment id (0 when the table has none)",
        &signature,
    ))
}
