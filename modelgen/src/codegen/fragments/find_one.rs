use super::{Fragment, ModelContext};
use crate::codegen::template::{bindings, TemplateKind};
use crate::error::Result;

bindings! {
    struct FindOneBindings {
        signature,
        key_expr,
        struct_name,
        fields,
        table,
        pk_column,
        pk_param,
    }
}

/// Lookup by primary key; read-through when caching
pub fn gen_find_one(ctx: &ModelContext<'_>, with_cache: bool) -> Result<Fragment> {
    let pk_param = ctx.primary_param();
    let signature = format!(
        "async fn {}(&self, {}: {}) -> ModelResult<{}>",
        ctx.keys.primary.method_name,
        pk_param,
        ctx.primary_param_type(),
        ctx.struct_name
    );

    let bindings = FindOneBindings {
        signature: signature.clone(),
        key_expr: ctx.key_expr(&ctx.keys.primary, None),
        struct_name: ctx.struct_name.clone(),
        fields: ctx.select_fields(),
        table: ctx.table.name.clone(),
        pk_column: ctx.primary.name.clone(),
        pk_param,
    };

    let kind = if with_cache {
        TemplateKind::FindOneCached
    } else {
        TemplateKind::FindOne
    };

    Ok(Fragment::method(
        ctx.templates.bind(kind, &bindings)?,
        "Find the row with the given primary key",
        &signature,
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, SETTINGS_DDL, TAGS_DDL, USERS_DDL};
    use super::*;

    #[test]
    fn test_find_one_cached() {
        let fixture = Fixture::new(USERS_DDL);
        let fragment = gen_find_one(&fixture.ctx(), true).unwrap();
        assert!(fragment
            .code
            .contains("async fn find_one(&self, id: i64) -> ModelResult<Users> {"));
        assert!(fragment
            .code
            .contains("let key = format!(\"{}{}\", CACHE_USERS_ID_PREFIX, id);"));
        assert!(fragment.code.contains("CACHE_NOT_FOUND_PLACEHOLDER"));
        assert!(fragment.code.contains("WHERE `id` = ? LIMIT 1"));
    }

    #[test]
    fn test_find_one_plain() {
        let fixture = Fixture::new(TAGS_DDL);
        let fragment = gen_find_one(&fixture.ctx(), false).unwrap();
        assert!(fragment
            .code
            .contains("async fn find_one(&self, code: &str) -> ModelResult<Tags> {"));
        assert!(!fragment.code.contains("cache"));
        assert!(fragment.code.contains(".ok_or(ModelError::NotFound)"));
    }

    #[test]
    fn test_primary_key_named_key() {
        let fixture = Fixture::new(SETTINGS_DDL);
        let code = gen_find_one(&fixture.ctx(), true).unwrap().code;

        assert!(code.contains("async fn find_one(&self, key_: &str) -> ModelResult<Settings>"));
        assert!(code.contains("let key = format!(\"{}{}\", CACHE_SETTINGS_KEY_PREFIX, key_);"));
        assert!(code.contains(".bind(key_)"));
        assert!(code.contains("self.cache.set(&key, serde_json::to_string(&row)?);"));
    }
}
