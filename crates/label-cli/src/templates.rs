//! Loading of template and record files.
//!
//! Templates are TOML documents:
//!
//! ```toml
//! name = "Lot label"
//! root_entity = "stock.lot"
//! dpi = 203
//! width = 4
//! height = 2
//! markup = "^XA^FO50,50^FD${LOT}^FS^XZ"
//!
//! [[placeholders]]
//! placeholder = "LOT"
//! field_path = "name"
//! ```
//!
//! Records are JSON objects, or arrays of objects.

use std::path::Path;

use anyhow::{Context, Result, bail};
use label_model::Template;
use label_render::reconcile_template;
use serde_json::Value;
use tracing::warn;

/// Parses a template and brings its bindings in line with the markup.
pub fn parse_template(contents: &str) -> Result<Template> {
    let mut template: Template = toml::from_str(contents).context("parse template")?;
    let changes = reconcile_template(&mut template);
    if !changes.removed.is_empty() {
        warn!(
            template = %template.name,
            removed = ?changes.removed,
            "ignoring bindings for placeholders not in the markup"
        );
    }
    for binding in &template.bindings {
        if let Err(error) = binding.validate_segments(&template.root_entity) {
            warn!(
                template = %template.name,
                placeholder = %binding.placeholder,
                %error,
                "binding path is broken"
            );
        }
    }
    Ok(template)
}

pub fn load_template(path: &Path) -> Result<Template> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read template {}", path.display()))?;
    parse_template(&contents).with_context(|| format!("load template {}", path.display()))
}

/// Parses one record or a list of records.
pub fn parse_records(contents: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(contents).context("parse record JSON")?;
    match value {
        Value::Array(items) => {
            if let Some(position) = items.iter().position(|item| !item.is_object()) {
                bail!("record {} is not a JSON object", position + 1);
            }
            Ok(items)
        }
        Value::Object(_) => Ok(vec![value]),
        other => bail!("expected a JSON object or array, found {}", json_kind(&other)),
    }
}

pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read records {}", path.display()))?;
    parse_records(&contents).with_context(|| format!("load records {}", path.display()))
}

/// Loads a file that must hold exactly one record.
pub fn load_single_record(path: &Path) -> Result<Value> {
    let mut records = load_records(path)?;
    if records.len() != 1 {
        bail!(
            "{} holds {} records; exactly one is required",
            path.display(),
            records.len()
        );
    }
    Ok(records.remove(0))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
