//! Reading tabular files from disk.

use std::path::Path;

use tracing::info;

use crate::error::{IngestError, Result};
use crate::options::TabularOptions;
use crate::tabular::{TabularData, parse_tabular};

/// Maximum file size for tabular loading (50 MB).
pub const MAX_TABULAR_FILE_SIZE: u64 = 50 * 1024 * 1024;

fn io_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reads and decodes a delimiter-separated file.
pub fn read_tabular_file(path: &Path, options: &TabularOptions) -> Result<TabularData> {
    check_file_size_with_limit(path, MAX_TABULAR_FILE_SIZE)?;
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    let table = parse_tabular(&bytes, options)?;
    info!(
        path = %path.display(),
        data_rows = table.data_row_count(),
        "loaded tabular file"
    );
    Ok(table)
}
