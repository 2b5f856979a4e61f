//! Byte-to-text decoding with a caller-chosen encoding.

use std::borrow::Cow;

use encoding_rs::Encoding;

use crate::error::{IngestError, Result};

/// Looks up an encoding by label.
///
/// Accepts every WHATWG label plus the `utf-8-sig` and `latin-1` spellings
/// common in spreadsheet exports.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    let lookup = match normalized.as_str() {
        "" | "utf-8-sig" | "utf8-sig" | "utf_8_sig" => "utf-8",
        "latin-1" | "latin_1" => "latin1",
        other => other,
    };
    Encoding::for_label(lookup.as_bytes()).ok_or_else(|| IngestError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Decodes `bytes` strictly; malformed input is an error, not replaced.
///
/// A byte-order mark is kept as U+FEFF and removed later from the first
/// header cell.
pub fn decode_text<'a>(bytes: &'a [u8], label: &str) -> Result<Cow<'a, str>> {
    let encoding = resolve_encoding(label)?;
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| IngestError::Decode {
            encoding: encoding.name().to_string(),
        })
}
