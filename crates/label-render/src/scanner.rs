//! Placeholder extraction from label markup.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use label_model::normalize_placeholder;
use regex::Regex;

/// `${NAME}` where NAME is any non-empty run of characters other than `}`.
pub(crate) static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid placeholder regex"));

/// Returns the sorted, de-duplicated placeholder names referenced in `markup`.
///
/// Names are trimmed; `${ LOT }` and `${LOT}` both yield `LOT`.
pub fn scan_placeholders(markup: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(markup)
        .map(|caps| normalize_placeholder(&caps[1]))
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Formats the literal token for a placeholder name.
pub fn placeholder_token(name: &str) -> String {
    format!("${{{name}}}")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn scan_dedupes_and_sorts() {
        let names = scan_placeholders("^FD${B}^FS^FD${A}^FS^FD${A}^FS");
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn scan_empty_markup() {
        assert!(scan_placeholders("").is_empty());
        assert!(scan_placeholders("^XA^XZ").is_empty());
    }

    #[test]
    fn scan_ignores_empty_and_unterminated_tokens() {
        assert_eq!(scan_placeholders("${}${A"), Vec::<String>::new());
        assert_eq!(scan_placeholders("$${X}}"), vec!["X"]);
    }

    #[test]
    fn scan_trims_names() {
        assert_eq!(scan_placeholders("${ LOT }${LOT}${ }"), vec!["LOT"]);
    }

    #[test]
    fn token_formats_wrapper() {
        assert_eq!(placeholder_token("LOT"), "${LOT}");
    }

    proptest! {
        #[test]
        fn scan_is_sorted_and_unique(names in prop::collection::vec("[A-Z_]{1,6}", 0..8)) {
            let markup: String = names.iter().map(|n| placeholder_token(n)).collect();
            let scanned = scan_placeholders(&markup);
            let mut expected = names.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(scanned, expected);
        }
    }
}
