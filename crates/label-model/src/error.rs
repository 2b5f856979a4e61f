use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A path segment follows a segment that does not land on a relation.
    #[error("path segment {index} ('{attribute}') has no source entity: previous segment '{previous}' is not a relation")]
    BrokenPath {
        index: usize,
        attribute: String,
        previous: String,
    },
    #[error("unsupported DPI {0} (expected 203, 300 or 600)")]
    UnsupportedDpi(u16),
}

pub type Result<T> = std::result::Result<T, ModelError>;
