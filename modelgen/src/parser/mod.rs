//! DDL parsing: statement splitting and `CREATE TABLE` extraction via sqlparser-rs

mod metadata;
mod schema_parser;
mod splitter;

pub use metadata::*;
pub use schema_parser::*;
pub use splitter::*;
