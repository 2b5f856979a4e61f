//! Value maps: the substitution source for one rendered label.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// Placeholder name to resolved string, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(BTreeMap<String, String>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.0.get(placeholder).map(String::as_str)
    }

    pub fn contains(&self, placeholder: &str) -> bool {
        self.0.contains_key(placeholder)
    }

    /// Sets a value unconditionally, replacing any baseline.
    pub fn set(&mut self, placeholder: impl Into<String>, value: impl Into<String>) {
        self.0.insert(placeholder.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Applies manual overrides on top of the current values.
    ///
    /// A non-empty override replaces the baseline. An empty override keeps
    /// the baseline, or records an empty value when there is none.
    pub fn overlay_overrides<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (placeholder, value) in overrides {
            let placeholder = placeholder.into();
            let value = value.into();
            if value.is_empty() {
                self.0.entry(placeholder).or_default();
            } else {
                self.0.insert(placeholder, value);
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_replace_when_non_empty() {
        let mut values: ValueMap = [("LOT", "L-1"), ("QTY", "3")].into_iter().collect();
        values.overlay_overrides([("LOT", ""), ("QTY", "5"), ("NOTE", "")]);

        assert_eq!(values.get("LOT"), Some("L-1"));
        assert_eq!(values.get("QTY"), Some("5"));
        assert_eq!(values.get("NOTE"), Some(""));
    }

    #[test]
    fn set_always_wins() {
        let mut values: ValueMap = [("LOT", "L-1")].into_iter().collect();
        values.set("LOT", "");
        assert_eq!(values.get("LOT"), Some(""));
    }

    #[test]
    fn iteration_is_ordered_by_name() {
        let values: ValueMap = [("B", "2"), ("A", "1")].into_iter().collect();
        let keys: Vec<&String> = values.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }
}
