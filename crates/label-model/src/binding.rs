//! Placeholder bindings and the field paths they resolve through.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::template::EntityType;

/// Strips an optional `${...}` wrapper and surrounding whitespace.
pub fn normalize_placeholder(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Composes `attribute.through`, or just `attribute` when there is no
/// through attribute.
pub fn compose_path(attribute: &str, through: Option<&str>) -> String {
    match through.map(str::trim).filter(|t| !t.is_empty()) {
        Some(through) => format!("{}.{through}", attribute.trim()),
        None => attribute.trim().to_string(),
    }
}

/// One step of an interactively composed field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub attribute: String,
    /// Entity type the attribute lands on, when it is a relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<EntityType>,
}

impl PathSegment {
    pub fn scalar(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            relation: None,
        }
    }

    pub fn relation(attribute: impl Into<String>, target: EntityType) -> Self {
        Self {
            attribute: attribute.into(),
            relation: Some(target),
        }
    }
}

/// Joins segment attributes into a dotted field path.
pub fn join_segments(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.attribute.trim())
        .collect::<Vec<_>>()
        .join(".")
}

/// Computes the entity type each segment draws its attributes from.
///
/// The first segment reads from `root`; every later segment reads from the
/// relation target of the segment before it.
pub fn segment_sources(root: &EntityType, segments: &[PathSegment]) -> Result<Vec<EntityType>> {
    let mut sources = Vec::with_capacity(segments.len());
    let mut current = Some(root.clone());
    let mut previous: Option<&PathSegment> = None;
    for (index, segment) in segments.iter().enumerate() {
        let Some(source) = current.take() else {
            return Err(ModelError::BrokenPath {
                index,
                attribute: segment.attribute.clone(),
                previous: previous
                    .map(|p| p.attribute.clone())
                    .unwrap_or_default(),
            });
        };
        sources.push(source);
        current = segment.relation.clone();
        previous = Some(segment);
    }
    Ok(sources)
}

/// Links one placeholder in the markup to the path its value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaceholderBinding {
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,
    /// Single bound attribute, used when no explicit path is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Attribute read through `attribute` when it is a relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    /// Overrides the template root type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_entity: Option<EntityType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<PathSegment>,
}

impl PlaceholderBinding {
    /// A binding with no path, as created when a placeholder first appears.
    pub fn unbound(placeholder: &str) -> Self {
        Self {
            placeholder: normalize_placeholder(placeholder),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    #[must_use]
    pub fn with_through(mut self, through: impl Into<String>) -> Self {
        self.through = Some(through.into());
        self
    }

    #[must_use]
    pub fn with_segments(mut self, segments: Vec<PathSegment>) -> Self {
        self.segments = segments;
        self
    }

    #[must_use]
    pub fn with_root_entity(mut self, root: EntityType) -> Self {
        self.root_entity = Some(root);
        self
    }

    /// Normalized placeholder name.
    pub fn name(&self) -> String {
        normalize_placeholder(&self.placeholder)
    }

    /// The field path this binding resolves through.
    ///
    /// Precedence: composed segments, explicit field path, then the bound
    /// attribute (joined with `through` when set).
    pub fn effective_path(&self) -> Option<String> {
        if !self.segments.is_empty() {
            let joined = join_segments(&self.segments);
            if !joined.is_empty() {
                return Some(joined);
            }
        }
        if let Some(path) = self
            .field_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            return Some(path.to_string());
        }
        self.attribute
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .map(|attribute| compose_path(attribute, self.through.as_deref()))
    }

    pub fn is_bound(&self) -> bool {
        self.effective_path().is_some()
    }

    /// Root type for this binding, falling back to the template's.
    pub fn root_entity_or<'a>(&'a self, template_root: &'a EntityType) -> &'a EntityType {
        self.root_entity.as_ref().unwrap_or(template_root)
    }

    /// Checks that the segment chain is well formed for `template_root`.
    pub fn validate_segments(&self, template_root: &EntityType) -> Result<()> {
        segment_sources(self.root_entity_or(template_root), &self.segments).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_wrapper_and_whitespace() {
        assert_eq!(normalize_placeholder("  ${ LOT } "), "LOT");
        assert_eq!(normalize_placeholder("LOT"), "LOT");
        assert_eq!(normalize_placeholder("${LOT"), "${LOT");
        assert_eq!(normalize_placeholder(""), "");
    }

    #[test]
    fn effective_path_precedence() {
        let binding = PlaceholderBinding::unbound("P")
            .with_attribute("product_id")
            .with_through("name");
        assert_eq!(binding.effective_path().as_deref(), Some("product_id.name"));

        let binding = binding.with_field_path(" lot_id.name ");
        assert_eq!(binding.effective_path().as_deref(), Some("lot_id.name"));

        let binding = binding.with_segments(vec![
            PathSegment::relation("product_id", EntityType::new("product.product")),
            PathSegment::scalar("barcode"),
        ]);
        assert_eq!(binding.effective_path().as_deref(), Some("product_id.barcode"));
    }

    #[test]
    fn unbound_binding_has_no_path() {
        let binding = PlaceholderBinding::unbound("${X}").with_field_path("   ");
        assert_eq!(binding.placeholder, "X");
        assert!(!binding.is_bound());
    }

    #[test]
    fn segment_sources_follow_relations() {
        let root = EntityType::new("stock.lot");
        let segments = vec![
            PathSegment::relation("product_id", EntityType::new("product.product")),
            PathSegment::relation("categ_id", EntityType::new("product.category")),
            PathSegment::scalar("name"),
        ];
        let sources = segment_sources(&root, &segments).unwrap();
        let names: Vec<&str> = sources.iter().map(EntityType::as_str).collect();
        assert_eq!(names, vec!["stock.lot", "product.product", "product.category"]);
    }

    #[test]
    fn segment_after_scalar_is_broken() {
        let root = EntityType::new("stock.lot");
        let segments = vec![PathSegment::scalar("name"), PathSegment::scalar("length")];
        let err = segment_sources(&root, &segments).unwrap_err();
        assert_eq!(
            err,
            ModelError::BrokenPath {
                index: 1,
                attribute: "length".to_string(),
                previous: "name".to_string(),
            }
        );
    }

    #[test]
    fn binding_root_override() {
        let template_root = EntityType::new("stock.lot");
        let binding = PlaceholderBinding::unbound("Q")
            .with_root_entity(EntityType::new("stock.quant"))
            .with_segments(vec![PathSegment::scalar("quantity")]);
        assert_eq!(binding.root_entity_or(&template_root).as_str(), "stock.quant");
        assert!(binding.validate_segments(&template_root).is_ok());
    }
}
