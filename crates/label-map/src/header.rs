//! Header normalization and lookup.

use std::collections::BTreeMap;

use tracing::debug;

/// Lowercases and removes whitespace, underscores and hyphens so that
/// `Lot Number`, `lot_number` and `LOT-NUMBER` compare equal.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect()
}

/// Normalized header name to column index.
///
/// When two headers normalize to the same key the first column wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: BTreeMap<String, usize>,
    headers: Vec<String>,
}

impl HeaderIndex {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut columns = BTreeMap::new();
        for (index, header) in headers.iter().enumerate() {
            let key = normalize_header(header.as_ref());
            if key.is_empty() {
                continue;
            }
            if let Some(first) = columns.get(&key) {
                debug!(
                    header = header.as_ref(),
                    column = index,
                    kept_column = *first,
                    "duplicate normalized header ignored"
                );
                continue;
            }
            columns.insert(key, index);
        }
        Self {
            columns,
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
        }
    }

    /// Column index whose header matches `name` after normalization.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.columns.get(&normalize_header(name)).copied()
    }

    /// Original header text of a column.
    pub fn header(&self, index: usize) -> Option<&str> {
        self.headers.get(index).map(String::as_str)
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }
}
