//! Error types for tabular ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading tabular input.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("tabular file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Configuration Errors ===
    /// Delimiter is not a single ASCII character.
    #[error("invalid delimiter '{delimiter}': expected a single ASCII character")]
    InvalidDelimiter { delimiter: String },

    /// Encoding label is not recognized.
    #[error("unknown text encoding '{label}'")]
    UnknownEncoding { label: String },

    // === Decoding Errors ===
    /// Bytes are not valid in the configured encoding.
    #[error("failed to decode input using {encoding}: malformed byte sequence")]
    Decode { encoding: String },

    /// Delimited text could not be split into records.
    #[error("failed to parse delimited text at record {record}: {message}")]
    Parse { record: u64, message: String },

    /// Input holds no rows at all.
    #[error("tabular input is empty")]
    EmptyInput,
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/labels.csv"),
        };
        assert_eq!(err.to_string(), "tabular file not found: /path/to/labels.csv");

        let err = IngestError::InvalidDelimiter {
            delimiter: ";;".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid delimiter ';;': expected a single ASCII character"
        );
    }
}
