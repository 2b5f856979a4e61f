//! Placeholder substitution.
//!
//! Both entry points share one substitution pass over the markup; they only
//! differ in where values come from and in how a missing value is treated.

use label_model::{PlaceholderBinding, Record, Template, ValueMap, normalize_placeholder};
use regex::Captures;
use tracing::debug;

use crate::resolver::PathResolver;
use crate::scanner::{PLACEHOLDER_REGEX, scan_placeholders};

/// Replaces every `${NAME}` token in one pass.
///
/// Lookups use the trimmed name. Tokens whose lookup returns `None` are left
/// in place. Values are inserted literally and are not scanned again.
fn substitute<'v>(markup: &str, lookup: impl Fn(&str) -> Option<&'v str>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(markup, |caps: &Captures<'_>| {
            match lookup(&normalize_placeholder(&caps[1])) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Builds the value map for `template` by resolving every scanned
/// placeholder against `record`, using `resolver`.
///
/// Placeholders without a binding, without a path, or without a record
/// resolve to an empty string.
pub fn values_from_record_with(
    template: &Template,
    record: Option<&dyn Record>,
    resolver: &PathResolver,
) -> ValueMap {
    let mut values = ValueMap::new();
    for placeholder in scan_placeholders(&template.markup) {
        let path = template
            .binding(&placeholder)
            .and_then(PlaceholderBinding::effective_path);
        let value = match (record, path.as_deref()) {
            (Some(record), Some(path)) => resolver.resolve(record, path),
            (_, None) => {
                debug!(template = %template.name, placeholder = %placeholder, "placeholder has no field path");
                String::new()
            }
            (None, Some(_)) => String::new(),
        };
        values.set(placeholder, value);
    }
    values
}

/// [`values_from_record_with`] using the default resolver.
pub fn values_from_record(template: &Template, record: Option<&dyn Record>) -> ValueMap {
    values_from_record_with(template, record, &PathResolver::default())
}

/// Renders `template` against a live record. Every token is replaced.
pub fn render_from_record_with(
    template: &Template,
    record: Option<&dyn Record>,
    resolver: &PathResolver,
) -> String {
    let values = values_from_record_with(template, record, resolver);
    substitute(&template.markup, |name| Some(values.get(name).unwrap_or_default()))
}

/// [`render_from_record_with`] using the default resolver.
pub fn render_from_record(template: &Template, record: Option<&dyn Record>) -> String {
    render_from_record_with(template, record, &PathResolver::default())
}

/// Renders `template` from precomputed values.
///
/// Placeholders absent from `values` keep their literal `${NAME}` token, so a
/// caller can tell "intentionally blank" from "never supplied".
pub fn render_from_values(template: &Template, values: &ValueMap) -> String {
    substitute(&template.markup, |name| values.get(name))
}

/// Renders with manual overrides layered on a record-derived baseline.
///
/// Non-empty overrides replace the baseline value; empty ones keep it.
pub fn render_with_overrides(
    template: &Template,
    record: Option<&dyn Record>,
    overrides: &ValueMap,
) -> String {
    let mut values = match record {
        Some(record) => values_from_record(template, Some(record)),
        None => ValueMap::new(),
    };
    values.overlay_overrides(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    render_from_values(template, &values)
}

#[cfg(test)]
mod tests {
    use label_model::EntityType;
    use serde_json::json;

    use super::*;

    fn template(markup: &str, bindings: Vec<PlaceholderBinding>) -> Template {
        Template::new("test", EntityType::new("stock.lot"), markup).with_bindings(bindings)
    }

    #[test]
    fn render_from_record_replaces_every_token() {
        let template = template(
            "^XA^FD${LOT}^FS^FD${PRODUCT}^FS^FD${LOT}^FS^FD${UNBOUND}^FS^XZ",
            vec![
                PlaceholderBinding::unbound("LOT").with_field_path("name"),
                PlaceholderBinding::unbound("PRODUCT")
                    .with_attribute("product_id")
                    .with_through("default_code"),
                PlaceholderBinding::unbound("UNBOUND"),
            ],
        );
        let record = json!({"name": "L1", "product_id": {"default_code": "W1"}});

        let zpl = render_from_record(&template, Some(&record));

        assert_eq!(zpl, "^XA^FDL1^FS^FDW1^FS^FDL1^FS^FD^FS^XZ");
        assert!(scan_placeholders(&zpl).is_empty());
    }

    #[test]
    fn render_from_record_without_record_blanks_everything() {
        let template = template(
            "${A}-${B}",
            vec![PlaceholderBinding::unbound("A").with_field_path("name")],
        );
        assert_eq!(render_from_record(&template, None), "-");
    }

    #[test]
    fn render_from_values_leaves_missing_tokens() {
        let template = template("${X}${Y}", vec![]);
        let values: ValueMap = [("X", "")].into_iter().collect();

        assert_eq!(render_from_values(&template, &values), "${Y}");
        assert_eq!(render_from_record(&template, None), "");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let template = template("${A}|${B}", vec![]);
        let values: ValueMap = [("A", "${B}"), ("B", "b")].into_iter().collect();
        insta::assert_snapshot!(render_from_values(&template, &values), @"${B}|b");
    }

    #[test]
    fn values_from_record_covers_every_placeholder() {
        let template = template(
            "${LOT}${QTY}",
            vec![PlaceholderBinding::unbound("LOT").with_field_path("name")],
        );
        let record = json!({"name": "L1"});

        let values = values_from_record(&template, Some(&record));

        assert_eq!(values.len(), 2);
        assert_eq!(values.get("LOT"), Some("L1"));
        assert_eq!(values.get("QTY"), Some(""));
    }

    #[test]
    fn overrides_replace_only_when_non_empty() {
        let template = template(
            "${LOT}/${QTY}/${NOTE}",
            vec![
                PlaceholderBinding::unbound("LOT").with_field_path("name"),
                PlaceholderBinding::unbound("QTY").with_field_path("qty"),
            ],
        );
        let record = json!({"name": "L1", "qty": 4});
        let overrides: ValueMap = [("LOT", ""), ("QTY", "10")].into_iter().collect();

        let zpl = render_with_overrides(&template, Some(&record), &overrides);

        assert_eq!(zpl, "L1/10/");
    }

    #[test]
    fn padded_tokens_take_trimmed_values() {
        let template = template("${ LOT }|${LOT}", vec![]);
        let values: ValueMap = [("LOT", "L1")].into_iter().collect();
        assert_eq!(render_from_values(&template, &values), "L1|L1");
    }

    #[test]
    fn overrides_without_record_keep_unsupplied_tokens() {
        let template = template("${LOT}/${QTY}", vec![]);
        let overrides: ValueMap = [("LOT", "L9")].into_iter().collect();
        assert_eq!(render_with_overrides(&template, None, &overrides), "L9/${QTY}");
    }
}
