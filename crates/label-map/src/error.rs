//! Error types for mapping operations.

use std::fmt;

/// Errors from mapping operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Directive text is not `PLACEHOLDER=COLUMN`.
    InvalidDirective(String),
    /// Directive names no placeholder.
    EmptyPlaceholder(String),
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDirective(text) => {
                write!(f, "Invalid mapping '{text}': expected PLACEHOLDER=COLUMN")
            }
            Self::EmptyPlaceholder(text) => write!(f, "Mapping '{text}' names no placeholder"),
        }
    }
}

impl std::error::Error for MappingError {}
