use super::{backticked, Fragment, ModelContext};
use crate::codegen::naming::to_const_name;

/// Table-level consts: table name, column lists and, with caching, one
/// prefix const per cache key
pub fn gen_vars(ctx: &ModelContext<'_>, with_cache: bool) -> Fragment {
    let table = ctx.table;
    let prefix = to_const_name(&table.name);
    let mut code = String::new();

    code.push_str(&format!(
        "/// Name of table `{}`\npub const {}_TABLE: &str = \"{}\";\n\n",
        table.name, prefix, table.name
    ));
    code.push_str(&format!(
        "/// Columns of [`{}`], in declaration order\npub const {}_FIELD_NAMES: &str = \"{}\";\n\n",
        ctx.struct_name,
        prefix,
        ctx.select_fields()
    ));
    code.push_str(&format!(
        "/// Columns written by insert\npub const {}_ROWS_EXPECT_AUTO_SET: &str = \"{}\";\n\n",
        prefix,
        backticked(ctx.insert_columns().iter().map(|c| c.name.as_str()))
    ));
    code.push_str(&format!(
        "/// Assignments of update\npub const {}_ROWS_WITH_PLACEHOLDER: &str = \"{}\";\n",
        prefix,
        ctx.update_columns()
            .iter()
            .map(|c| format!("`{}` = ?", c.name))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    if with_cache {
        for key in ctx.keys.all() {
            code.push_str(&format!(
                "\n/// Cache key prefix of lookups by {}\nconst {}: &str = \"{}\";\n",
                key.columns.join(", "),
                key.const_name,
                key.prefix
            ));
        }
    }

    Fragment::code(code)
}
