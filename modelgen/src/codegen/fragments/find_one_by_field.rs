use super::{bind_lines, where_clause, Fragment, ModelContext};
use crate::codegen::template::{bindings, TemplateKind};
use crate::error::Result;

bindings! {
    struct FindOneByFieldBindings {
        signature,
        key_expr,
        pk_type,
        primary_arg,
        struct_name,
        fields,
        table,
        where_clause,
        binds,
        pk_field,
        row_pk_arg,
    }
}

bindings! {
    struct ExtraBindings { model_name, pk_param, pk_param_type, key_expr }
}

/// Output of [`gen_find_one_by_field`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOneByFieldCode {
    /// One method implementation per unique key
    pub find_one_method: String,

    /// Trait method declarations, one per unique key
    pub find_one_interface_method: String,

    /// Helpers shared by every unique-key lookup of the table, emitted once
    pub cache_extra: String,
}

/// Lookups by unique key, one per key group.
///
/// Empty when the table has no unique key. With caching, a unique key maps
/// to the primary key value, which is then resolved through `find_one`.
pub fn gen_find_one_by_field(
    ctx: &ModelContext<'_>,
    with_cache: bool,
) -> Result<FindOneByFieldCode> {
    if !ctx.keys.has_unique_cache_key() {
        return Ok(FindOneByFieldCode::default());
    }

    let mut methods = Vec::new();
    let mut interface_methods = Vec::new();
    let kind = if with_cache {
        TemplateKind::FindOneByFieldCached
    } else {
        TemplateKind::FindOneByField
    };

    for key in &ctx.keys.unique {
        let signature = format!(
            "async fn {}(&self, {}) -> ModelResult<{}>",
            key.method_name,
            ctx.param_list(&key.columns),
            ctx.struct_name
        );
        let binds: Vec<String> = key.columns.iter().map(|c| ctx.param_name(c)).collect();

        let bindings = FindOneByFieldBindings {
            signature: signature.clone(),
            key_expr: ctx.key_expr(key, None),
            pk_type: ctx.primary_type.to_type_string(),
            primary_arg: ctx.primary_type.pass_expr("primary"),
            struct_name: ctx.struct_name.clone(),
            fields: ctx.select_fields(),
            table: ctx.table.name.clone(),
            where_clause: where_clause(&key.columns),
            binds: bind_lines(&binds),
            pk_field: ctx.primary_field(),
            row_pk_arg: ctx
                .primary_type
                .pass_expr(&format!("row.{}", ctx.primary_field())),
        };

        let fragment = Fragment::method(
            ctx.templates.bind(kind, &bindings)?,
            &format!("Find the row with the given {}", key.columns.join(", ")),
            &signature,
        );
        methods.push(fragment.code);
        interface_methods.extend(fragment.method);
    }

    let cache_extra = if with_cache {
        let bindings = ExtraBindings {
            model_name: ctx.model_name.clone(),
            pk_param: ctx.primary_param(),
            pk_param_type: ctx.primary_param_type(),
            key_expr: ctx.key_expr(&ctx.keys.primary, None),
        };
        ctx.templates
            .bind(TemplateKind::FindOneByFieldExtra, &bindings)?
    } else {
        String::new()
    };

    Ok(FindOneByFieldCode {
        find_one_method: methods.join("\n"),
        find_one_interface_method: interface_methods.join("\n"),
        cache_extra,
    })
}
