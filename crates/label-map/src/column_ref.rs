//! Spreadsheet-style column references.

/// Parses a 1-based number (`"1"`, `"12"`) or a letter reference (`"A"`,
/// `"AA"`) into a 0-based column index.
///
/// Mixed references (`"A1"`), zero, empty input and overflowing values yield
/// `None`.
pub fn parse_column_ref(reference: &str) -> Option<usize> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if reference.bytes().all(|b| b.is_ascii_digit()) {
        let number: usize = reference.parse().ok()?;
        return number.checked_sub(1);
    }
    if !reference.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let mut value: usize = 0;
    for letter in reference.bytes().map(|b| b.to_ascii_uppercase()) {
        let digit = usize::from(letter - b'A' + 1);
        value = value.checked_mul(26)?.checked_add(digit)?;
    }
    value.checked_sub(1)
}

/// Formats a 0-based column index as a spreadsheet letter reference.
pub fn column_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_letters_and_numbers() {
        assert_eq!(parse_column_ref("A"), Some(0));
        assert_eq!(parse_column_ref("B"), Some(1));
        assert_eq!(parse_column_ref("Z"), Some(25));
        assert_eq!(parse_column_ref("AA"), Some(26));
        assert_eq!(parse_column_ref("ab"), Some(27));
        assert_eq!(parse_column_ref("1"), Some(0));
        assert_eq!(parse_column_ref("12"), Some(11));
        assert_eq!(parse_column_ref(" 3 "), Some(2));
    }

    #[test]
    fn rejects_invalid_references() {
        for bad in ["A1", "0", "", "  ", "-1", "1.5", "Ä", "ZZZZZZZZZZZZZZZZZZZZ"] {
            assert_eq!(parse_column_ref(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn labels_round_trip_common_columns() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    proptest! {
        #[test]
        fn label_parses_back(index in 0usize..100_000) {
            prop_assert_eq!(parse_column_ref(&column_label(index)), Some(index));
        }
    }
}
