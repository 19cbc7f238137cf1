//! Built-in templates
//!
//! Generated code only carries doc comments: plain `//` comments do not
//! survive the final formatting pass.

/// One model file
pub const MODEL: &str = r#"//! Model for table `{{table}}` in module `{{pkg}}`. Generated by modelgen.

{{imports}}

{{vars}}

{{types}}

{{new}}

#[async_trait::async_trait]
impl<P: Pool> {{trait_name}} for {{model_name}}<P> {
{{insert}}

{{find}}

{{update}}

{{delete}}
}

{{extra_method}}
"#;

/// Shared declarations of a model directory
pub const VARS: &str = r#"//! Shared declarations for the `{{pkg}}` models. Generated by modelgen.

/// Value cached for a key whose row does not exist
pub const CACHE_NOT_FOUND_PLACEHOLDER: &str = "*";

/// Errors returned by generated models
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No row matches the lookup
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] rdbi::Error),
    #[error("cache codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type of generated models
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Key-value cache used by cached models
pub trait ModelCache: Send + Sync {
    /// Cached value of `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`
    fn set(&self, key: &str, value: String);

    /// Remove every key in `keys`
    fn del(&self, keys: &[String]);
}
"#;

pub const TYPES: &str = r#"/// Data access operations on table `{{table}}`
#[async_trait::async_trait]
pub trait {{trait_name}}: Send + Sync {
{{methods}}
}

/// [`{{trait_name}}`] backed by an rdbi pool{{cache_doc}}
pub struct {{model_name}}<P: Pool> {
{{model_fields}}
}

/// Row of table `{{table}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, rdbi::FromRow, rdbi::ToParams)]
pub struct {{struct_name}} {
{{fields}}
}
"#;

pub const NEW: &str = r#"impl<P: Pool> {{model_name}}<P> {
    /// Create a model for table `{{table}}`
    pub fn new({{params}}) -> Self {
        Self { {{fields}} }
    }
}
"#;

pub const INSERT: &str = r#"    {{signature}} {
        let result = Query::new("INSERT INTO `{{table}}` ({{columns}}) VALUES ({{placeholders}})")
{{binds}}
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_id.unwrap_or(0);
{{invalidate}}
        Ok(id)
    }
"#;

pub const FIND_ONE: &str = r#"    {{signature}} {
        Query::new("SELECT {{fields}} FROM `{{table}}` WHERE `{{pk_column}}` = ? LIMIT 1")
            .bind({{pk_param}})
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ModelError::NotFound)
    }
"#;

pub const FIND_ONE_CACHED: &str = r#"    {{signature}} {
        let key = {{key_expr}};
        if let Some(cached) = self.cache.get(&key) {
            if cached == CACHE_NOT_FOUND_PLACEHOLDER {
                return Err(ModelError::NotFound);
            }
            return Ok(serde_json::from_str(&cached)?);
        }
        let row: Option<{{struct_name}}> = Query::new("SELECT {{fields}} FROM `{{table}}` WHERE `{{pk_column}}` = ? LIMIT 1")
            .bind({{pk_param}})
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                self.cache.set(&key, serde_json::to_string(&row)?);
                Ok(row)
            }
            None => {
                self.cache.set(&key, CACHE_NOT_FOUND_PLACEHOLDER.to_string());
                Err(ModelError::NotFound)
            }
        }
    }
"#;

pub const FIND_ONE_BY_FIELD: &str = r#"    {{signature}} {
        Query::new("SELECT {{fields}} FROM `{{table}}` WHERE {{where_clause}} LIMIT 1")
{{binds}}
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ModelError::NotFound)
    }
"#;

pub const FIND_ONE_BY_FIELD_CACHED: &str = r#"    {{signature}} {
        let key = {{key_expr}};
        if let Some(cached) = self.cache.get(&key) {
            if cached == CACHE_NOT_FOUND_PLACEHOLDER {
                return Err(ModelError::NotFound);
            }
            let primary: {{pk_type}} = serde_json::from_str(&cached)?;
            return self.find_one({{primary_arg}}).await;
        }
        let row: Option<{{struct_name}}> = Query::new("SELECT {{fields}} FROM `{{table}}` WHERE {{where_clause}} LIMIT 1")
{{binds}}
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                self.cache.set(&key, serde_json::to_string(&row.{{pk_field}})?);
                self.cache.set(&Self::primary_cache_key({{row_pk_arg}}), serde_json::to_string(&row)?);
                Ok(row)
            }
            None => {
                self.cache.set(&key, CACHE_NOT_FOUND_PLACEHOLDER.to_string());
                Err(ModelError::NotFound)
            }
        }
    }
"#;

pub const FIND_ONE_BY_FIELD_EXTRA: &str = r#"impl<P: Pool> {{model_name}}<P> {
    /// Cache key of the row whose primary key is `{{pk_param}}`
    fn primary_cache_key({{pk_param}}: {{pk_param_type}}) -> String {
        {{key_expr}}
    }
}
"#;

pub const UPDATE: &str = r#"    {{signature}} {
{{load_old}}
        Query::new("UPDATE `{{table}}` SET {{set_clause}} WHERE `{{pk_column}}` = ?")
{{binds}}
            .execute(&self.pool)
            .await?;
{{invalidate}}
        Ok(())
    }
"#;

pub const DELETE: &str = r#"    {{signature}} {
{{load_old}}
        Query::new("DELETE FROM `{{table}}` WHERE `{{pk_column}}` = ?")
            .bind({{pk_param}})
            .execute(&self.pool)
            .await?;
{{invalidate}}
        Ok(())
    }
"#;
