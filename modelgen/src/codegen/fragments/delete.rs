use super::{cache_del, Fragment, ModelContext};
use crate::codegen::template::{bindings, TemplateKind};
use crate::error::Result;

bindings! {
    struct DeleteBindings {
        signature,
        load_old,
        table,
        pk_column,
        pk_param,
        invalidate,
    }
}

/// Delete by primary key.
///
/// With unique keys cached, the row is read back through `find_one` so its
/// unique keys can be invalidated; deleting a missing row is then `NotFound`.
pub fn gen_delete(ctx: &ModelContext<'_>, with_cache: bool) -> Result<Fragment> {
    let pk_param = ctx.primary_param();
    let signature = format!(
        "async fn delete(&self, {}: {}) -> ModelResult<()>",
        pk_param,
        ctx.primary_param_type()
    );
    let load_data = with_cache && ctx.keys.has_unique_cache_key();

    let load_old = if load_data {
        format!(
            "        let data = self.{}({}).await?;",
            ctx.keys.primary.method_name, pk_param
        )
    } else {
        String::new()
    };

    let invalidate = if load_data {
        let keys: Vec<String> = ctx.keys.all().map(|k| ctx.key_expr(k, Some("data"))).collect();
        cache_del(&keys)
    } else if with_cache {
        cache_del(&[ctx.key_expr(&ctx.keys.primary, None)])
    } else {
        String::new()
    };

    let bindings = DeleteBindings {
        signature: signature.clone(),
        load_old,
        table: ctx.table.name.clone(),
        pk_column: ctx.primary.name.clone(),
        pk_param: pk_param.clone(),
        invalidate,
    };

    Ok(Fragment::method(
        ctx.templates.bind(TemplateKind::Delete, &bindings)?,
        "Delete the row with the given primary key",
        &signature,
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, ENTRIES_DDL, TAGS_DDL, USERS_DDL};
    use super::*;

    #[test]
    fn test_delete_loads_row_for_unique_keys() {
        let fixture = Fixture::new(USERS_DDL);
        let fragment = gen_delete(&fixture.ctx(), true).unwrap();

        assert!(fragment.code.contains("let data = self.find_one(id).await?;"));
        assert!(fragment.code.contains("DELETE FROM `users` WHERE `id` = ?"));
        assert!(fragment
            .code
            .contains("format!(\"{}{}:{}\", CACHE_USERS_ORG_ID_NAME_PREFIX, data.org_id, data.name)"));
        assert!(fragment
            .method
            .unwrap()
            .contains("async fn delete(&self, id: i64) -> ModelResult<()>;"));
    }

    #[test]
    fn test_delete_primary_only() {
        let fixture = Fixture::new(TAGS_DDL);
        let code = gen_delete(&fixture.ctx(), true).unwrap().code;
        assert!(!code.contains("let data"));
        assert!(code.contains("self.cache.del(&[format!(\"{}{}\", CACHE_TAGS_CODE_PREFIX, code)]);"));
    }

    #[test]
    fn test_delete_without_cache() {
        let fixture = Fixture::new(USERS_DDL);
        let code = gen_delete(&fixture.ctx(), false).unwrap().code;
        assert!(!code.contains("find_one"));
        assert!(!code.contains("self.cache"));
    }

    #[test]
    fn test_primary_key_named_data() {
        let fixture = Fixture::new(ENTRIES_DDL);
        let fragment = gen_delete(&fixture.ctx(), true).unwrap();

        assert!(fragment.code.contains("let data = self.find_one(data_).await?;"));
        assert!(fragment.code.contains(".bind(data_)"));
        assert!(fragment
            .code
            .contains("format!(\"{}{}\", CACHE_ENTRIES_DATA_PREFIX, data.data)"));
        assert!(fragment
            .method
            .unwrap()
            .contains("async fn delete(&self, data_: i64) -> ModelResult<()>;"));
    }
}
