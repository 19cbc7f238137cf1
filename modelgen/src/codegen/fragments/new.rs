use super::{Fragment, ModelContext};
use crate::codegen::template::{bindings, TemplateKind};
use crate::error::Result;

bindings! {
    struct NewBindings { model_name, table, params, fields }
}

/// Constructor of the model struct
pub fn gen_new(ctx: &ModelContext<'_>, with_cache: bool) -> Result<Fragment> {
    let (params, fields) = if with_cache {
        ("pool: P, cache: Arc<dyn ModelCache>", "pool, cache")
    } else {
        ("pool: P", "pool")
    };

    let bindings = NewBindings {
        model_name: ctx.model_name.clone(),
        table: ctx.table.name.clone(),
        params: params.to_string(),
        fields: fields.to_string(),
    };

    Ok(Fragment::code(ctx.templates.bind(TemplateKind::New, &bindings)?))
}
