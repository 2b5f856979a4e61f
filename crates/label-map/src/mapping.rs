//! Directive-driven column mapping.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column_ref::parse_column_ref;
use crate::error::MappingError;
use crate::header::HeaderIndex;

/// How one placeholder (or group base) should find its column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingDirective {
    /// Placeholder name, or the base name of a grouped placeholder.
    pub placeholder: String,
    /// Explicit choice: a header name or a column reference.
    pub selector: Option<String>,
    /// Header name hint.
    pub header: Option<String>,
    /// Column reference hint (`3`, `C`).
    pub column_ref: Option<String>,
}

impl MappingDirective {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    #[must_use]
    pub fn with_column_ref(mut self, column_ref: impl Into<String>) -> Self {
        self.column_ref = Some(column_ref.into());
        self
    }

    fn resolve(&self, index: &HeaderIndex) -> Option<(usize, MatchSource)> {
        if let Some(selector) = non_blank(self.selector.as_deref()) {
            if let Some(column) = index.find(selector) {
                return Some((column, MatchSource::SelectorHeader));
            }
            if let Some(column) = parse_column_ref(selector) {
                return Some((column, MatchSource::SelectorReference));
            }
        }
        if let Some(column) = non_blank(self.header.as_deref()).and_then(|h| index.find(h)) {
            return Some((column, MatchSource::Header));
        }
        non_blank(self.column_ref.as_deref())
            .and_then(parse_column_ref)
            .map(|column| (column, MatchSource::ColumnReference))
    }
}

/// Parses `PLACEHOLDER=COLUMN`, where COLUMN is the selector.
impl FromStr for MappingDirective {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (placeholder, selector) = s
            .split_once('=')
            .ok_or_else(|| MappingError::InvalidDirective(s.to_string()))?;
        let placeholder = placeholder.trim();
        if placeholder.is_empty() {
            return Err(MappingError::EmptyPlaceholder(s.to_string()));
        }
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(MappingError::InvalidDirective(s.to_string()));
        }
        Ok(Self::new(placeholder).with_selector(selector))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Which part of a directive produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    SelectorHeader,
    SelectorReference,
    Header,
    ColumnReference,
}

impl MatchSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelectorHeader => "selector (header)",
            Self::SelectorReference => "selector (reference)",
            Self::Header => "header",
            Self::ColumnReference => "column reference",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedColumn {
    pub index: usize,
    pub source: MatchSource,
}

/// Placeholder (or group base) to zero-based column index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<String, MappedColumn>,
}

impl ColumnMapping {
    pub fn get(&self, placeholder: &str) -> Option<usize> {
        self.columns.get(placeholder.trim()).map(|c| c.index)
    }

    pub fn column(&self, placeholder: &str) -> Option<MappedColumn> {
        self.columns.get(placeholder.trim()).copied()
    }

    pub fn insert(&mut self, placeholder: impl Into<String>, index: usize, source: MatchSource) {
        self.columns
            .insert(placeholder.into(), MappedColumn { index, source });
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MappedColumn)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Directive placeholders that did not resolve to a column.
    pub fn unmapped(&self, directives: &[MappingDirective]) -> Vec<String> {
        directives
            .iter()
            .map(|d| d.placeholder.trim())
            .filter(|p| !p.is_empty() && !self.columns.contains_key(*p))
            .map(str::to_string)
            .collect()
    }
}

/// Resolves each directive against the header row.
///
/// Order per directive: selector as header, selector as column reference,
/// header hint, column reference hint. Unmatched directives are left out.
pub fn build_column_mapping<S: AsRef<str>>(
    headers: &[S],
    directives: &[MappingDirective],
) -> ColumnMapping {
    let index = HeaderIndex::new(headers);
    let mut mapping = ColumnMapping::default();
    for directive in directives {
        let placeholder = directive.placeholder.trim();
        if placeholder.is_empty() {
            continue;
        }
        match directive.resolve(&index) {
            Some((column, source)) => {
                if column >= index.width() {
                    debug!(
                        placeholder,
                        column,
                        width = index.width(),
                        "column lies beyond the header row"
                    );
                }
                debug!(placeholder, column, source = source.as_str(), "mapped column");
                mapping.insert(placeholder, column, source);
            }
            None => debug!(placeholder, "no column matched"),
        }
    }
    mapping
}

/// One directive per placeholder, with the header hint filled in when a
/// header matches the placeholder name.
pub fn suggest_directives<P: AsRef<str>, H: AsRef<str>>(
    placeholders: &[P],
    headers: &[H],
) -> Vec<MappingDirective> {
    let index = HeaderIndex::new(headers);
    placeholders
        .iter()
        .map(|placeholder| {
            let name = placeholder.as_ref().trim();
            let directive = MappingDirective::new(name);
            match index.find(name).and_then(|column| index.header(column)) {
                Some(header) => directive.with_header(header),
                None => directive,
            }
        })
        .collect()
}
