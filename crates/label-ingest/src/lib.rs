//! Tabular input for bulk label printing.
//!
//! This crate decodes delimiter-separated files into rows of strings. Row 0
//! is always the header row; the mapper and the print pipeline address every
//! other row by its index in the same list.
//!
//! # Features
//!
//! - **Encodings**: any WHATWG label plus `utf-8-sig` and `latin-1`
//! - **Delimiters**: a single configurable ASCII character (default `,`)
//! - **BOM**: stripped from the first header cell
//!
//! # Example
//!
//! ```ignore
//! use label_ingest::{TabularOptions, read_tabular_file};
//!
//! let options = TabularOptions::default().with_delimiter(";");
//! let table = read_tabular_file(Path::new("labels.csv"), &options)?;
//! println!("{:?}", table.headers());
//! ```

mod decode;
mod error;
mod options;
mod reader;
mod tabular;

// === Error Types ===
pub use error::{IngestError, Result};

// === Options ===
pub use options::{DEFAULT_DELIMITER, DEFAULT_ENCODING, TabularOptions};

// === Decoding ===
pub use decode::{decode_text, resolve_encoding};

// === Tables ===
pub use reader::{MAX_TABULAR_FILE_SIZE, check_file_size_with_limit, read_tabular_file};
pub use tabular::{TabularData, parse_tabular};
