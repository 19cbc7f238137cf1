//! Slot templates for generated code
//!
//! Every template is bound from a typed record (see [`bindings!`]) whose
//! fields are exactly the slots the built-in text uses. Templates can be
//! overridden from a directory; an override referencing a slot its record
//! does not provide fails with a binding error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::templates;
use crate::error::{CodegenError, Result};

/// Named slot values of one template binding
pub trait Bindings {
    fn slots(&self) -> Vec<(&'static str, &str)>;
}

/// Declare a binding record: a struct of `String` slots plus its [`Bindings`] impl
macro_rules! bindings {
    ($(#[$meta:meta])* $vis:vis struct $name:ident { $($field:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            $(pub $field: String,)*
        }

        impl $crate::codegen::template::Bindings for $name {
            fn slots(&self) -> Vec<(&'static str, &str)> {
                vec![$((stringify!($field), self.$field.as_str()),)*]
            }
        }
    };
}
pub(crate) use bindings;

/// The templates a generation run binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Model,
    Vars,
    Types,
    New,
    Insert,
    FindOne,
    FindOneCached,
    FindOneByField,
    FindOneByFieldCached,
    FindOneByFieldExtra,
    Update,
    Delete,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 12] = [
        TemplateKind::Model,
        TemplateKind::Vars,
        TemplateKind::Types,
        TemplateKind::New,
        TemplateKind::Insert,
        TemplateKind::FindOne,
        TemplateKind::FindOneCached,
        TemplateKind::FindOneByField,
        TemplateKind::FindOneByFieldCached,
        TemplateKind::FindOneByFieldExtra,
        TemplateKind::Update,
        TemplateKind::Delete,
    ];

    /// File name of an override in a template directory
    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateKind::Model => "model.tpl",
            TemplateKind::Vars => "vars.tpl",
            TemplateKind::Types => "types.tpl",
            TemplateKind::New => "new.tpl",
            TemplateKind::Insert => "insert.tpl",
            TemplateKind::FindOne => "find-one.tpl",
            TemplateKind::FindOneCached => "find-one-cached.tpl",
            TemplateKind::FindOneByField => "find-one-by-field.tpl",
            TemplateKind::FindOneByFieldCached => "find-one-by-field-cached.tpl",
            TemplateKind::FindOneByFieldExtra => "find-one-by-field-extra.tpl",
            TemplateKind::Update => "update.tpl",
            TemplateKind::Delete => "delete.tpl",
        }
    }

    fn builtin(&self) -> &'static str {
        match self {
            TemplateKind::Model => templates::MODEL,
            TemplateKind::Vars => templates::VARS,
            TemplateKind::Types => templates::TYPES,
            TemplateKind::New => templates::NEW,
            TemplateKind::Insert => templates::INSERT,
            TemplateKind::FindOne => templates::FIND_ONE,
            TemplateKind::FindOneCached => templates::FIND_ONE_CACHED,
            TemplateKind::FindOneByField => templates::FIND_ONE_BY_FIELD,
            TemplateKind::FindOneByFieldCached => templates::FIND_ONE_BY_FIELD_CACHED,
            TemplateKind::FindOneByFieldExtra => templates::FIND_ONE_BY_FIELD_EXTRA,
            TemplateKind::Update => templates::UPDATE,
            TemplateKind::Delete => templates::DELETE,
        }
    }
}

/// Built-in templates plus any directory overrides
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    overrides: HashMap<TemplateKind, String>,
}

impl TemplateSet {
    /// Only the compiled-in templates
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Built-in templates, replaced by `<dir>/<kind file name>` where such a file exists
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(CodegenError::ConfigError(format!(
                "template directory not found: {}",
                dir.display()
            )));
        }

        let mut overrides = HashMap::new();
        for kind in TemplateKind::ALL {
            let path = dir.join(kind.file_name());
            if path.is_file() {
                debug!("Using template override {}", path.display());
                overrides.insert(kind, fs::read_to_string(&path)?);
            }
        }

        Ok(Self { overrides })
    }

    /// Override a single template
    pub fn with_override(mut self, kind: TemplateKind, text: impl Into<String>) -> Self {
        self.overrides.insert(kind, text.into());
        self
    }

    pub fn text(&self, kind: TemplateKind) -> &str {
        self.overrides
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.builtin())
    }

    /// Substitute every `{{slot}}` of a template with its binding
    pub fn bind(&self, kind: TemplateKind, bindings: &dyn Bindings) -> Result<String> {
        bind_text(kind.file_name(), self.text(kind), bindings)
    }
}

fn bind_text(name: &str, text: &str, bindings: &dyn Bindings) -> Result<String> {
    let slots = bindings.slots();
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| CodegenError::binding(name, "unterminated `{{`"))?;
        let slot = after[..end].trim();
        let value = slots
            .iter()
            .find(|(n, _)| *n == slot)
            .map(|(_, v)| *v)
            .ok_or_else(|| CodegenError::binding(name, format!("unknown slot `{}`", slot)))?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);

    Ok(out)
}
