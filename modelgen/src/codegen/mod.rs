//! Code generation module

mod cache_key;
pub mod fragments;
mod model;
mod naming;
pub mod template;
mod templates;
mod type_resolver;
mod writer;

pub use cache_key::*;
pub use model::*;
pub use naming::*;
pub use template::{TemplateKind, TemplateSet};
pub use type_resolver::*;
pub use writer::*;

use crate::error::{CodegenError, Result};

/// Parse generated source and pretty-print it.
///
/// Source that does not parse is reported against the template it came from.
pub(crate) fn format_source(template: &str, code: &str) -> Result<String> {
    let file = syn::parse_file(code).map_err(|e| CodegenError::binding(template, e))?;
    Ok(prettyplease::unparse(&file))
}
