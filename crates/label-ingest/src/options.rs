//! Caller-supplied parsing options.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_ENCODING: &str = "utf-8";

/// How to decode and split a tabular file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularOptions {
    /// Field delimiter; empty means the default comma.
    pub delimiter: String,
    /// Encoding label such as `utf-8`, `utf-8-sig` or `latin-1`.
    pub encoding: String,
}

impl Default for TabularOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl TabularOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// The delimiter as a byte, validated.
    pub fn delimiter_byte(&self) -> Result<u8> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(DEFAULT_DELIMITER as u8),
            (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(c as u8),
            _ => Err(IngestError::InvalidDelimiter {
                delimiter: self.delimiter.clone(),
            }),
        }
    }
}
