//! Field-path resolution against a record graph.
//!
//! Resolution is display oriented and never fails: an absent value at any
//! step, a missing attribute, a scalar where a relation is needed or an
//! ambiguous relation set all resolve to an empty string.

use label_model::{AttributeValue, Record};
use tracing::trace;

pub use label_model::compose_path;

/// Separator used when a path ends on several related records.
pub const DEFAULT_LIST_DELIMITER: &str = ", ";

/// Walks dotted field paths from a root record.
#[derive(Debug, Clone)]
pub struct PathResolver {
    delimiter: String,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_LIST_DELIMITER.to_string(),
        }
    }

    /// Uses `delimiter` to join the labels of a final relation set.
    #[must_use]
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    /// Resolves `path` against `record` into a display string.
    pub fn resolve<'r>(&self, record: &'r dyn Record, path: &str) -> String {
        let segments: Vec<&str> = path.split('.').map(str::trim).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            trace!(path, "field path has an empty segment");
            return String::new();
        }

        let last = segments.len() - 1;
        let mut current: &'r dyn Record = record;
        for (index, segment) in segments.iter().enumerate() {
            let value = current.attribute(segment);
            if value.is_empty() {
                trace!(path, segment, "field path stopped at an empty value");
                return String::new();
            }
            if index == last {
                return self.display(value);
            }
            current = match value {
                AttributeValue::Relation(next) => next,
                AttributeValue::RelationSet(records) if records.len() == 1 => records[0],
                other => {
                    trace!(path, segment, value = ?other, "field path cannot continue");
                    return String::new();
                }
            };
        }
        String::new()
    }

    fn display(&self, value: AttributeValue<'_>) -> String {
        match value {
            AttributeValue::Scalar(text) => text,
            AttributeValue::Flag(true) => "true".to_string(),
            AttributeValue::Relation(record) => record.display_label(),
            AttributeValue::RelationSet(records) => records
                .iter()
                .map(|record| record.display_label())
                .collect::<Vec<_>>()
                .join(&self.delimiter),
            AttributeValue::Missing | AttributeValue::Empty | AttributeValue::Flag(false) => {
                String::new()
            }
        }
    }
}

/// Resolves `path` with the default list delimiter.
pub fn resolve_path(record: &dyn Record, path: &str) -> String {
    PathResolver::new().resolve(record, path)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use super::*;

    fn lot() -> Value {
        json!({
            "name": "LOT-42",
            "expiration_date": null,
            "active": true,
            "archived": false,
            "product_qty": 12.5,
            "product_id": {
                "display_name": "[W1] Widget",
                "default_code": "W1",
                "categ_id": {"name": "Hardware"},
                "seller_ids": [],
            },
            "tag_ids": [{"name": "fragile"}, {"name": "cold"}],
            "owner_ids": [{"name": "Ana", "country_id": {"name": "PT"}}],
        })
    }

    #[test]
    fn resolves_scalars_and_relations() {
        let record = lot();
        assert_eq!(resolve_path(&record, "name"), "LOT-42");
        assert_eq!(resolve_path(&record, "product_qty"), "12.5");
        assert_eq!(resolve_path(&record, "product_id"), "[W1] Widget");
        assert_eq!(resolve_path(&record, "product_id.default_code"), "W1");
        assert_eq!(resolve_path(&record, "product_id.categ_id.name"), "Hardware");
        assert_eq!(resolve_path(&record, " product_id . default_code "), "W1");
    }

    #[test]
    fn final_relation_set_joins_labels() {
        let record = lot();
        assert_eq!(resolve_path(&record, "tag_ids"), "fragile, cold");
        let resolver = PathResolver::with_delimiter("|");
        assert_eq!(resolver.resolve(&record, "tag_ids"), "fragile|cold");
    }

    #[test]
    fn singleton_set_is_followed_but_multi_set_is_not() {
        let record = lot();
        assert_eq!(resolve_path(&record, "owner_ids.country_id.name"), "PT");
        assert_eq!(resolve_path(&record, "tag_ids.name"), "");
    }

    #[test]
    fn flags_render_true_or_empty() {
        let record = lot();
        assert_eq!(resolve_path(&record, "active"), "true");
        assert_eq!(resolve_path(&record, "archived"), "");
    }

    #[test]
    fn misses_resolve_to_empty() {
        let record = lot();
        assert_eq!(resolve_path(&record, "expiration_date"), "");
        assert_eq!(resolve_path(&record, "expiration_date.year"), "");
        assert_eq!(resolve_path(&record, "missing"), "");
        assert_eq!(resolve_path(&record, "name.length"), "");
        assert_eq!(resolve_path(&record, "product_id.seller_ids.name"), "");
        assert_eq!(resolve_path(&record, "product_id..name"), "");
        assert_eq!(resolve_path(&record, ""), "");
    }

    #[test]
    fn compose_path_joins_through_attribute() {
        assert_eq!(compose_path("product_id", Some("barcode")), "product_id.barcode");
        assert_eq!(compose_path("product_id", Some(" ")), "product_id");
        assert_eq!(compose_path("name", None), "name");
    }

    proptest! {
        #[test]
        fn empty_intermediate_always_yields_empty(tail in prop::collection::vec("[a-z_]{1,8}", 0..4)) {
            let record = json!({"empty": null, "blank": "", "none": []});
            for head in ["empty", "blank", "none", "absent"] {
                let mut path = vec![head.to_string()];
                path.extend(tail.iter().cloned());
                prop_assert_eq!(resolve_path(&record, &path.join(".")), "");
            }
        }
    }
}
