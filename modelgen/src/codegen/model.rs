//! Assembles the fragments of one table into a formatted model file

use tracing::debug;

use super::cache_key::derive_cache_keys;
use super::fragments::{
    gen_delete, gen_find_one, gen_find_one_by_field, gen_imports, gen_insert, gen_new, gen_types,
    gen_update, gen_vars, ModelContext,
};
use super::format_source;
use super::template::{bindings, TemplateKind, TemplateSet};
use crate::error::Result;
use crate::parser::Table;

bindings! {
    struct ModelBindings {
        table,
        pkg,
        imports,
        vars,
        types,
        new,
        trait_name,
        model_name,
        insert,
        find,
        update,
        delete,
        extra_method,
    }
}

bindings! {
    struct VarsBindings { pkg }
}

/// Generate the model file of one table.
///
/// Cache keys are derived first, so a table without a usable primary key
/// fails before any template is bound. The trait declarations and the impl
/// block are rendered from the same signatures.
pub fn gen_model(
    table: &Table,
    with_cache: bool,
    templates: &TemplateSet,
    pkg: &str,
) -> Result<String> {
    let keys = derive_cache_keys(table)?;
    let ctx = ModelContext::new(table, &keys, templates, pkg)?;
    debug!(
        "Generating model for {} ({} unique keys, cache={})",
        table.name,
        keys.unique.len(),
        with_cache
    );

    let imports = gen_imports(&ctx, with_cache);
    let vars = gen_vars(&ctx, with_cache);
    let insert = gen_insert(&ctx, with_cache)?;
    let find_one = gen_find_one(&ctx, with_cache)?;
    let by_field = gen_find_one_by_field(&ctx, with_cache)?;
    let update = gen_update(&ctx, with_cache)?;
    let delete = gen_delete(&ctx, with_cache)?;

    let methods = [
        insert.method.as_deref(),
        find_one.method.as_deref(),
        Some(by_field.find_one_interface_method.as_str()),
        update.method.as_deref(),
        delete.method.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|m| !m.trim().is_empty())
    .collect::<Vec<_>>()
    .join("\n");

    let types = gen_types(&ctx, &methods, with_cache)?;
    let new = gen_new(&ctx, with_cache)?;

    let find = [find_one.code.as_str(), by_field.find_one_method.as_str()]
        .into_iter()
        .filter(|code| !code.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let bindings = ModelBindings {
        table: table.name.clone(),
        pkg: pkg.to_string(),
        imports: imports.code,
        vars: vars.code,
        types: types.code,
        new: new.code,
        trait_name: ctx.trait_name.clone(),
        model_name: ctx.model_name.clone(),
        insert: insert.code,
        find,
        update: update.code,
        delete: delete.code,
        extra_method: by_field.cache_extra,
    };

    let code = templates.bind(TemplateKind::Model, &bindings)?;
    format_source(TemplateKind::Model.file_name(), &code)
}

/// Generate the shared declarations file of a model directory
pub fn gen_vars_file(templates: &TemplateSet, pkg: &str) -> Result<String> {
    let bindings = VarsBindings {
        pkg: pkg.to_string(),
    };
    let code = templates.bind(TemplateKind::Vars, &bindings)?;
    format_source(TemplateKind::Vars.file_name(), &code)
}
