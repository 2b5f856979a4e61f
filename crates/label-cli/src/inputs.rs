//! Command-line value and mapping inputs.

use anyhow::{Result, bail};
use label_map::MappingDirective;
use label_model::{ValueMap, normalize_placeholder};

/// Parses `NAME=VALUE` assignments into a value map.
///
/// The value may be empty; the name may not.
pub fn parse_assignments(items: &[String]) -> Result<ValueMap> {
    let mut values = ValueMap::new();
    for item in items {
        let Some((name, value)) = item.split_once('=') else {
            bail!("invalid value '{item}': expected NAME=VALUE");
        };
        let name = normalize_placeholder(name);
        if name.is_empty() {
            bail!("invalid value '{item}': placeholder name is empty");
        }
        values.set(name, value);
    }
    Ok(values)
}

/// Replaces suggested directives with explicit ones for the same
/// placeholder; explicit directives for other names are appended.
pub fn merge_directives(
    suggested: Vec<MappingDirective>,
    explicit: &[MappingDirective],
) -> Vec<MappingDirective> {
    let mut merged = suggested;
    for directive in explicit {
        let key = directive.placeholder.trim();
        match merged
            .iter_mut()
            .find(|existing| existing.placeholder.trim() == key)
        {
            Some(existing) => {
                let placeholder = existing.placeholder.clone();
                *existing = MappingDirective {
                    placeholder,
                    ..directive.clone()
                };
            }
            None => merged.push(directive.clone()),
        }
    }
    merged
}
