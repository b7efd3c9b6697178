//! Join-key normalization for region names.
//!
//! Geometry files in the wild carry region names whose UTF-8 bytes were decoded
//! as Windows-1252 somewhere upstream ("RHÃ”NE" instead of "RHÔNE"). Names
//! that differ only in such corruption, or in Unicode composition, must still
//! match the production table.

use encoding_rs::WINDOWS_1252;
use unicode_normalization::UnicodeNormalization;

use crate::config::NameRepair;

/// Normalize a geometry-side region name: literal repairs first, then generic
/// mojibake repair, then NFC composition and whitespace trim.
pub fn normalize_region_name(name: &str, repairs: &[NameRepair]) -> String {
    let mut fixed = name.to_string();
    for repair in repairs {
        if fixed.contains(&repair.from) {
            fixed = fixed.replace(&repair.from, &repair.to);
        }
    }
    if let Some(decoded) = repair_mojibake(&fixed) {
        fixed = decoded;
    }
    normalize_join_key(&fixed)
}

/// NFC composition and trim; applied to production-side region names.
pub fn normalize_join_key(name: &str) -> String {
    name.nfc().collect::<String>().trim().to_string()
}

/// Re-encode `s` as Windows-1252 and decode the bytes as UTF-8.
///
/// Returns `None` when `s` is ASCII, holds a character outside Windows-1252,
/// or when the bytes are not valid UTF-8 (i.e. `s` was not mojibake).
pub fn repair_mojibake(s: &str) -> Option<String> {
    if s.is_ascii() {
        return None;
    }
    let (bytes, _, had_errors) = WINDOWS_1252.encode(s);
    if had_errors {
        return None;
    }
    String::from_utf8(bytes.into_owned())
        .ok()
        .filter(|decoded| decoded != s)
}
