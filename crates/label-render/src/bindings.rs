//! Keeps placeholder bindings in step with template markup.

use label_model::{PlaceholderBinding, Template, normalize_placeholder};
use tracing::debug;

use crate::scanner::scan_placeholders;

/// Placeholders added and removed by a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl BindingChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Rebuilds the binding list for a freshly scanned placeholder set.
///
/// Existing bindings are kept as they are (their name normalized), missing
/// placeholders get an unbound binding and orphaned bindings are dropped.
/// The result follows the order of `scanned`, one binding per normalized name.
pub fn reconcile_bindings(
    existing: &[PlaceholderBinding],
    scanned: &[String],
) -> Vec<PlaceholderBinding> {
    let mut reconciled: Vec<PlaceholderBinding> = Vec::with_capacity(scanned.len());
    for name in normalized_names(scanned) {
        let binding = existing
            .iter()
            .find(|binding| binding.name() == name)
            .map(|binding| PlaceholderBinding {
                placeholder: name.clone(),
                ..binding.clone()
            })
            .unwrap_or_else(|| PlaceholderBinding::unbound(&name));
        reconciled.push(binding);
    }
    reconciled
}

fn normalized_names(scanned: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(scanned.len());
    for name in scanned.iter().map(|raw| normalize_placeholder(raw)) {
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Reconciles a template's bindings against its current markup in place.
///
/// Bindings without a root type take the template's.
pub fn reconcile_template(template: &mut Template) -> BindingChanges {
    let scanned = normalized_names(&scan_placeholders(&template.markup));
    let previous: Vec<String> = template.bindings.iter().map(PlaceholderBinding::name).collect();

    let changes = BindingChanges {
        added: scanned
            .iter()
            .filter(|name| !previous.contains(name))
            .cloned()
            .collect(),
        removed: previous
            .iter()
            .filter(|name| !scanned.contains(name))
            .cloned()
            .collect(),
    };
    template.bindings = reconcile_bindings(&template.bindings, &scanned);
    for binding in &mut template.bindings {
        if binding.root_entity.is_none() {
            binding.root_entity = Some(template.root_entity.clone());
        }
    }

    if !changes.is_empty() {
        debug!(
            template = %template.name,
            added = ?changes.added,
            removed = ?changes.removed,
            "reconciled placeholder bindings"
        );
    }
    changes
}
