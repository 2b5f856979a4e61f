//! Error types for printing.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for print operations.
pub type Result<T> = std::result::Result<T, PrintError>;

/// Errors raised while preparing or running a print job.
///
/// Everything except [`PrintError::Dispatch`] is reported before the first
/// batch leaves the process.
#[derive(Debug, Error)]
pub enum PrintError {
    // === Configuration ===
    /// A required print service setting is absent or blank.
    #[error("missing print service configuration: {field}")]
    MissingConfig { field: &'static str },

    /// A print service setting has an unusable value.
    #[error("invalid print service configuration {field}: {value}")]
    InvalidConfig { field: &'static str, value: String },

    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    // === Job setup ===
    #[error("template '{name}' has no markup")]
    EmptyTemplate { name: String },

    #[error("no print destination given")]
    MissingDestination,

    #[error("invalid batch size {size}: at least one label per batch is required")]
    InvalidBatchSize { size: usize },

    #[error("invalid copy count {copies}: at least one copy is required")]
    InvalidCopies { copies: u32 },

    /// Row 0 holds the headers and cannot be printed.
    #[error("start row 0 is the header row; data starts at row 1")]
    HeaderRowSelected,

    #[error("start row {start} is beyond the end of the data ({rows} rows)")]
    StartRowOutOfRange { start: usize, rows: usize },

    #[error("no rows left to print from row {from} ({rows} rows)")]
    NoRemainingRows { from: usize, rows: usize },

    #[error("the remainder can only be printed after a test print")]
    TestPrintRequired,

    // === Dispatch ===
    /// A batch was rejected; earlier batches were already sent.
    #[error("batch {batch} failed: {source}")]
    Dispatch {
        batch: usize,
        #[source]
        source: DispatchError,
    },
}

/// Failure reported by a print dispatch collaborator.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("print service timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("print service unreachable: {0}")]
    Transport(String),

    #[error("print service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Failure while rasterizing a preview image.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("preview service unreachable: {0}")]
    Transport(String),

    #[error("preview service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to create HTTP client: {0}")]
    Client(String),
}
