#![deny(unsafe_code)]

//! Column mapping for bulk label printing.
//!
//! Maps the columns of a tabular file onto template placeholders, either by
//! matching header names or through explicit column references (`3`, `C`,
//! `AA`). Grouped placeholders are mapped by their base name.

mod column_ref;
mod error;
mod header;
mod mapping;

pub use column_ref::{column_label, parse_column_ref};
pub use error::MappingError;
pub use header::{HeaderIndex, normalize_header};
pub use mapping::{
    ColumnMapping, MappedColumn, MappingDirective, MatchSource, build_column_mapping,
    suggest_directives,
};
