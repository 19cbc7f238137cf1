use super::{bind_lines, cache_del, Fragment, ModelContext};
use crate::codegen::naming::escape_field_name;
use crate::codegen::template::{bindings, TemplateKind};
use crate::codegen::type_resolver::TypeResolver;
use crate::error::Result;

bindings! {
    struct UpdateBindings {
        signature,
        load_old,
        table,
        set_clause,
        pk_column,
        binds,
        invalidate,
    }
}

/// Full-row update by primary key.
///
/// With caching and unique keys, the stored row is loaded first so the
/// unique keys it was cached under are invalidated along with the new ones.
pub fn gen_update(ctx: &ModelContext<'_>, with_cache: bool) -> Result<Fragment> {
    let signature = format!(
        "async fn update(&self, data: &{}) -> ModelResult<()>",
        ctx.struct_name
    );
    let pk_field = format!("data.{}", ctx.primary_field());

    let mut set_columns = ctx.update_columns();
    if set_columns.is_empty() {
        set_columns.push(ctx.primary);
    }
    let set_clause = set_columns
        .iter()
        .map(|c| format!("`{}` = ?", c.name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut binds: Vec<String> = set_columns
        .iter()
        .map(|c| TypeResolver::resolve(c).bind_expr(&format!("data.{}", escape_field_name(&c.name))))
        .collect();
    binds.push(ctx.primary_type.bind_expr(&pk_field));

    let load_old = if with_cache && ctx.keys.has_unique_cache_key() {
        format!(
            "        let old: Option<{}> = Query::new(\"SELECT {} FROM `{}` WHERE `{}` = ? LIMIT 1\")\n            .bind({})\n            .fetch_optional(&self.pool)\n            .await?;",
            ctx.struct_name,
            ctx.select_fields(),
            ctx.table.name,
            ctx.primary.name,
            ctx.primary_type.bind_expr(&pk_field),
        )
    } else {
        String::new()
    };

    let invalidate = if with_cache {
        let mut keys: Vec<String> = ctx.keys.all().map(|k| ctx.key_expr(k, Some("data"))).collect();
        let mut code = cache_del(&keys);
        if ctx.keys.has_unique_cache_key() {
            keys = ctx.keys.unique.iter().map(|k| ctx.key_expr(k, Some("old"))).collect();
            code = format!(
                "{}\n        if let Some(old) = old {{\n    {}\n        }}",
                code,
                cache_del(&keys)
            );
        }
        code
    } else {
        String::new()
    };

    let bindings = UpdateBindings {
        signature: signature.clone(),
        load_old,
        table: ctx.table.name.clone(),
        set_clause,
        pk_column: ctx.primary.name.clone(),
        binds: bind_lines(&binds),
        invalidate,
    };

    Ok(Fragment::method(
        ctx.templates.bind(TemplateKind::Update, &bindings)?,
        "Update every non-key column of the row with the same primary key",
        &signature,
    ))
}
