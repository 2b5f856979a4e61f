//! Label templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::binding::{PlaceholderBinding, normalize_placeholder};
use crate::error::ModelError;

/// Name of the record type a template (or binding) resolves paths against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Print resolution of a label template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Dpi {
    /// 8 dots per millimetre.
    Dpi203,
    /// 12 dots per millimetre.
    Dpi300,
    /// 24 dots per millimetre.
    Dpi600,
}

impl Dpi {
    /// Dots per millimetre, as used by rasterization services.
    #[must_use]
    pub const fn dots_per_mm(self) -> u8 {
        match self {
            Self::Dpi203 => 8,
            Self::Dpi300 => 12,
            Self::Dpi600 => 24,
        }
    }

    #[must_use]
    pub const fn dots_per_inch(self) -> u16 {
        match self {
            Self::Dpi203 => 203,
            Self::Dpi300 => 300,
            Self::Dpi600 => 600,
        }
    }
}

impl TryFrom<u16> for Dpi {
    type Error = ModelError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            203 => Ok(Self::Dpi203),
            300 => Ok(Self::Dpi300),
            600 => Ok(Self::Dpi600),
            other => Err(ModelError::UnsupportedDpi(other)),
        }
    }
}

impl From<Dpi> for u16 {
    fn from(dpi: Dpi) -> Self {
        dpi.dots_per_inch()
    }
}

/// A printer-language label template with its placeholder bindings.
///
/// Bindings are kept in step with the markup by `reconcile_bindings` in the
/// render crate; the template itself never rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    /// Default record type that binding paths start from.
    pub root_entity: EntityType,
    #[serde(default)]
    pub markup: String,
    #[serde(default, rename = "placeholders")]
    pub bindings: Vec<PlaceholderBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<Dpi>,
    /// Label width in inches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Label height in inches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Template {
    pub fn new(name: impl Into<String>, root_entity: EntityType, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root_entity,
            markup: markup.into(),
            bindings: Vec::new(),
            dpi: None,
            width: None,
            height: None,
        }
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: Vec<PlaceholderBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn with_geometry(mut self, dpi: Dpi, width: f64, height: f64) -> Self {
        self.dpi = Some(dpi);
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Returns true when the markup holds anything besides whitespace.
    pub fn has_markup(&self) -> bool {
        !self.markup.trim().is_empty()
    }

    /// Finds the binding for a placeholder, comparing normalized names.
    pub fn binding(&self, placeholder: &str) -> Option<&PlaceholderBinding> {
        let wanted = normalize_placeholder(placeholder);
        self.bindings.iter().find(|binding| binding.name() == wanted)
    }
}
