//! Decoded tabular data.

use csv::ReaderBuilder;
use tracing::debug;

use crate::decode::decode_text;
use crate::error::{IngestError, Result};
use crate::options::TabularOptions;

/// Rows of a decoded delimiter-separated file; row 0 is the header row.
///
/// Rows may have different lengths. A cell beyond the end of its row reads
/// as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularData {
    rows: Vec<Vec<String>>,
}

impl TabularData {
    /// Builds a table from rows, normalizing the header row.
    ///
    /// Header cells are trimmed and a byte-order mark on the first cell is
    /// removed.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if let Some(header) = rows.first_mut() {
            for cell in header.iter_mut() {
                *cell = cell.trim().to_string();
            }
            if let Some(first) = header.first_mut()
                && let Some(stripped) = first.strip_prefix('\u{feff}')
            {
                *first = stripped.trim_start().to_string();
            }
        }
        Self { rows }
    }

    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows after the header.
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cell text, or `""` when the row or column does not exist.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }
}

/// Decodes and splits `bytes` into a [`TabularData`].
pub fn parse_tabular(bytes: &[u8], options: &TabularOptions) -> Result<TabularData> {
    let delimiter = options.delimiter_byte()?;
    let text = decode_text(bytes, &options.encoding)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IngestError::Parse {
            record: e
                .position()
                .map_or(index as u64 + 1, |position| position.record() + 1),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if rows.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let table = TabularData::from_rows(rows);
    debug!(
        rows = table.len(),
        columns = table.headers().len(),
        delimiter = %(delimiter as char).escape_default(),
        encoding = %options.encoding,
        "parsed tabular input"
    );
    Ok(table)
}
