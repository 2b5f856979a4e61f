//! The record-graph capability consumed by the path resolver.
//!
//! The engine never depends on concrete entity types. Anything that can
//! answer "what is the value of attribute `name`" and "how do I label this
//! record for display" can be rendered onto a label.

use std::fmt;

use serde_json::Value;

/// Keys consulted, in order, for the display label of a JSON object.
const DISPLAY_KEYS: [&str; 2] = ["display_name", "name"];

/// Value of a single attribute on a record.
pub enum AttributeValue<'a> {
    /// The record has no attribute with this name.
    Missing,
    /// The attribute exists but holds nothing.
    Empty,
    /// A displayable scalar.
    Scalar(String),
    /// A boolean flag; `false` renders as empty.
    Flag(bool),
    /// A reference to one other record.
    Relation(&'a dyn Record),
    /// References to several other records.
    RelationSet(Vec<&'a dyn Record>),
}

impl AttributeValue<'_> {
    /// Returns true when the value counts as absent for path walking.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Missing | Self::Empty | Self::Flag(false) => true,
            Self::Scalar(text) => text.is_empty(),
            Self::RelationSet(records) => records.is_empty(),
            Self::Flag(true) | Self::Relation(_) => false,
        }
    }
}

impl fmt::Debug for AttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("Missing"),
            Self::Empty => f.write_str("Empty"),
            Self::Scalar(text) => f.debug_tuple("Scalar").field(text).finish(),
            Self::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Self::Relation(record) => f
                .debug_tuple("Relation")
                .field(&record.display_label())
                .finish(),
            Self::RelationSet(records) => f
                .debug_tuple("RelationSet")
                .field(
                    &records
                        .iter()
                        .map(|record| record.display_label())
                        .collect::<Vec<_>>(),
                )
                .finish(),
        }
    }
}

/// A node in a heterogeneous record graph.
pub trait Record {
    /// Fetches the named attribute.
    fn attribute(&self, name: &str) -> AttributeValue<'_>;

    /// Human-readable label used when a relation is the final path segment.
    fn display_label(&self) -> String;
}

/// JSON objects are records: keys are attributes, nested objects are
/// relations and arrays are relation sets.
impl Record for Value {
    fn attribute(&self, name: &str) -> AttributeValue<'_> {
        let Some(object) = self.as_object() else {
            return AttributeValue::Missing;
        };
        match object.get(name) {
            None => AttributeValue::Missing,
            Some(value) => json_attribute(value),
        }
    }

    fn display_label(&self) -> String {
        match self {
            Value::Object(object) => DISPLAY_KEYS
                .iter()
                .find_map(|key| object.get(*key).and_then(scalar_text))
                .unwrap_or_default(),
            other => scalar_text(other).unwrap_or_default(),
        }
    }
}

fn json_attribute(value: &Value) -> AttributeValue<'_> {
    match value {
        Value::Null => AttributeValue::Empty,
        Value::Bool(flag) => AttributeValue::Flag(*flag),
        Value::Number(number) => AttributeValue::Scalar(number.to_string()),
        Value::String(text) if text.is_empty() => AttributeValue::Empty,
        Value::String(text) => AttributeValue::Scalar(text.clone()),
        Value::Object(_) => AttributeValue::Relation(value),
        Value::Array(items) if items.is_empty() => AttributeValue::Empty,
        Value::Array(items) => {
            AttributeValue::RelationSet(items.iter().map(|item| item as &dyn Record).collect())
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
