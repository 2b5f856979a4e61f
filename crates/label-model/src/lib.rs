//! Label template data model.
//!
//! Types shared by every stage of the label engine: templates and their
//! placeholder bindings, path segments, value maps, and the [`Record`]
//! capability the path resolver walks.

pub mod binding;
pub mod error;
pub mod record;
pub mod template;
pub mod values;

pub use binding::{
    PathSegment, PlaceholderBinding, compose_path, join_segments, normalize_placeholder,
    segment_sources,
};
pub use error::{ModelError, Result};
pub use record::{AttributeValue, Record};
pub use template::{Dpi, EntityType, Template};
pub use values::ValueMap;
