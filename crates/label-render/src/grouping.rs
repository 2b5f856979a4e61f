//! Detection of repeating placeholder series.
//!
//! A template that prints several input rows on one label names the
//! per-row slots with a counter suffix: `QTY_R1`, `QTY_R2`, `QTY_R3`. Those
//! collapse into one base placeholder (`QTY`) for column mapping, and the
//! largest series decides how many rows one label consumes.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use label_model::normalize_placeholder;
use regex::Regex;

/// `<BASE>_R<counter>`, case-insensitive on the `R`.
static GROUP_MEMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_[Rr](\d+)$").expect("Invalid group member regex"));

/// Result of grouping analysis over a placeholder set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingAnalysis {
    collapsed: Vec<String>,
    plain: Vec<String>,
    groups: BTreeMap<String, Vec<String>>,
    rows_per_label: usize,
}

impl GroupingAnalysis {
    /// One entry per base name or ungrouped placeholder, in first-seen order.
    pub fn collapsed(&self) -> &[String] {
        &self.collapsed
    }

    /// Base name to member placeholders, ordered by counter.
    pub fn groups(&self) -> &BTreeMap<String, Vec<String>> {
        &self.groups
    }

    /// Members of a group; the index is the row offset within a label.
    pub fn members(&self, base: &str) -> Option<&[String]> {
        self.groups.get(base).map(Vec::as_slice)
    }

    pub fn is_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Placeholders without a counter suffix, in first-seen order.
    ///
    /// A plain `QTY` next to `QTY_R1` is listed here as well as being a
    /// group base.
    pub fn ungrouped(&self) -> impl Iterator<Item = &str> {
        self.plain.iter().map(String::as_str)
    }

    /// Input rows consumed by one rendered label (at least 1).
    pub fn rows_per_label(&self) -> usize {
        self.rows_per_label
    }

    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }
}

fn split_member(name: &str) -> Option<(&str, u64)> {
    let caps = GROUP_MEMBER_REGEX.captures(name)?;
    let base = caps.get(1)?.as_str();
    let counter = caps.get(2)?.as_str().parse().ok()?;
    Some((base, counter))
}

/// Collapses counter-suffixed placeholders into their base names.
///
/// Names are normalized first, so `${ QTY_R1 }` joins the `QTY` series.
pub fn analyze_groups<S: AsRef<str>>(placeholders: &[S]) -> GroupingAnalysis {
    let mut collapsed: Vec<String> = Vec::new();
    let mut plain: Vec<String> = Vec::new();
    let mut members: BTreeMap<String, Vec<(u64, usize, String)>> = BTreeMap::new();

    for (position, placeholder) in placeholders.iter().enumerate() {
        let name = normalize_placeholder(placeholder.as_ref());
        if name.is_empty() {
            continue;
        }
        let entry = match split_member(&name) {
            Some((base, counter)) => {
                let list = members.entry(base.to_string()).or_default();
                if !list.iter().any(|(_, _, member)| *member == name) {
                    list.push((counter, position, name.clone()));
                }
                base
            }
            None => {
                if !plain.contains(&name) {
                    plain.push(name.clone());
                }
                name.as_str()
            }
        };
        if !collapsed.iter().any(|existing| existing == entry) {
            collapsed.push(entry.to_string());
        }
    }

    let groups: BTreeMap<String, Vec<String>> = members
        .into_iter()
        .map(|(base, mut list)| {
            list.sort_by_key(|(counter, position, _)| (*counter, *position));
            (base, list.into_iter().map(|(_, _, name)| name).collect())
        })
        .collect();

    let rows_per_label = groups.values().map(Vec::len).max().unwrap_or(1).max(1);

    GroupingAnalysis {
        collapsed,
        plain,
        groups,
        rows_per_label,
    }
}
