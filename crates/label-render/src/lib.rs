//! Label template rendering.
//!
//! This crate turns a [`Template`](label_model::Template) plus a record or a
//! value map into final printer markup.
//!
//! # Stages
//!
//! - **Scan**: find the `${NAME}` placeholders in the markup
//! - **Reconcile**: keep the template's bindings in step with the markup
//! - **Resolve**: walk a dotted field path through a record graph
//! - **Render**: substitute resolved values back into the markup
//! - **Group**: detect `NAME_R1`, `NAME_R2`, ... series that span several
//!   input rows per label
//!
//! # Example
//!
//! ```ignore
//! use label_render::{render_from_record, scan_placeholders};
//!
//! let names = scan_placeholders(&template.markup);
//! let zpl = render_from_record(&template, Some(&record));
//! ```

mod bindings;
mod grouping;
mod renderer;
mod resolver;
mod scanner;

pub use bindings::{BindingChanges, reconcile_bindings, reconcile_template};
pub use grouping::{GroupingAnalysis, analyze_groups};
pub use renderer::{
    render_from_record, render_from_record_with, render_from_values, render_with_overrides,
    values_from_record, values_from_record_with,
};
pub use resolver::{DEFAULT_LIST_DELIMITER, PathResolver, compose_path, resolve_path};
pub use scanner::{placeholder_token, scan_placeholders};
