use super::{Fragment, ModelContext};
use crate::codegen::naming::escape_field_name;
use crate::codegen::template::{bindings, TemplateKind};
use crate::codegen::type_resolver::TypeResolver;
use crate::error::Result;
use crate::parser::Table;

bindings! {
    struct TypesBindings {
        table,
        trait_name,
        model_name,
        struct_name,
        methods,
        cache_doc,
        model_fields,
        fields,
    }
}

/// The capability trait, the model struct and the row struct.
///
/// `methods` is the aggregated list of trait method declarations, so this
/// fragment is rendered after every operation fragment.
pub fn gen_types(ctx: &ModelContext<'_>, methods: &str, with_cache: bool) -> Result<Fragment> {
    let mut model_fields = String::from("    pool: P,");
    if with_cache {
        model_fields.push_str("\n    cache: Arc<dyn ModelCache>,");
    }

    let bindings = TypesBindings {
        table: ctx.table.name.clone(),
        trait_name: ctx.trait_name.clone(),
        model_name: ctx.model_name.clone(),
        struct_name: ctx.struct_name.clone(),
        methods: methods.to_string(),
        cache_doc: if with_cache {
            " with a read-through cache".to_string()
        } else {
            String::new()
        },
        model_fields,
        fields: struct_fields(ctx.table),
    };

    Ok(Fragment::code(
        ctx.templates.bind(TemplateKind::Types, &bindings)?,
    ))
}

fn struct_fields(table: &Table) -> String {
    let mut code = String::new();

    for col in &table.columns {
        let field_name = escape_field_name(&col.name);
        let rust_type = TypeResolver::resolve(col);

        code.push_str(&format!("    /// Column: `{}`", col.name));
        if table.is_primary_key_column(&col.name) {
            code.push_str(" (PRIMARY KEY)");
        }
        for uk in &table.unique_keys {
            if uk.columns.contains(&col.name) {
                code.push_str(&format!(" (UNIQUE: {})", uk.name));
            }
        }
        if let Some(comment) = &col.comment {
            if !comment.is_empty() {
                code.push_str(&format!(" - {}", comment.replace('\n', " ")));
            }
        }
        code.push('\n');

        let mut attrs = Vec::new();
        if field_name != col.name {
            attrs.push(format!("rename = \"{}\"", col.name));
        }
        if col.is_auto_increment {
            attrs.push("skip_insert".to_string());
        }
        if !attrs.is_empty() {
            code.push_str(&format!("    #[rdbi({})]\n", attrs.join(", ")));
        }
        if field_name != col.name {
            code.push_str(&format!("    #[serde(rename = \"{}\")]\n", col.name));
        }

        code.push_str(&format!(
            "    pub {}: {},\n",
            field_name,
            rust_type.to_type_string()
        ));
    }

    code
}
