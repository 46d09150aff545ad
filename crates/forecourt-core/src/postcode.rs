//! # UK Postcode Patterns
//!
//! A full UK postcode is an outward code (area + district, e.g. `SW1A`)
//! followed by an inward code (sector + unit, e.g. `1AA`). Providers
//! sometimes only know the outward code, which the decomposition engine
//! accepts as a partial postcode.
//!
//! Both searches are case-insensitive and start on a word boundary. The
//! full search also ends on one. The outward search stops after an optional
//! trailing letter, so `SE17` yields `SE1`. Form validation uses the wider
//! exact patterns below.

use std::sync::LazyLock;

use regex::Regex;

static FULL_SEARCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[A-Z]{1,2}[0-9][A-Z0-9]?\s?[0-9][A-Z]{2}\b").expect("full postcode pattern")
});

static PREFIX_SEARCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[A-Z]{1,2}[0-9][A-Z]?").expect("outward code pattern")
});

static FULL_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]?\s?[0-9][A-Z]{2}$").expect("full postcode pattern")
});

static PREFIX_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]?$").expect("outward code pattern")
});

/// First full postcode embedded in `text`, e.g. `SW1A 2AA` in a formatted address.
pub fn find_full(text: &str) -> Option<&str> {
    FULL_SEARCH.find(text).map(|m| m.as_str())
}

/// First bare outward code embedded in `text`, e.g. `SE1`.
pub fn find_prefix(text: &str) -> Option<&str> {
    PREFIX_SEARCH.find(text).map(|m| m.as_str())
}

/// Whether `value` is exactly one full postcode.
pub fn is_full(value: &str) -> bool {
    FULL_EXACT.is_match(value.trim())
}

/// Whether `value` is a full postcode or a bare outward code.
pub fn is_valid(value: &str) -> bool {
    let value = value.trim();
    FULL_EXACT.is_match(value) || PREFIX_EXACT.is_match(value)
}

/// Uppercase and, for full postcodes, put exactly one space before the
/// inward code. Anything that is not a recognizable postcode is only trimmed
/// and uppercased.
pub fn normalize(value: &str) -> String {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if compact.is_ascii() && FULL_EXACT.is_match(&compact) {
        let split = compact.len() - 3;
        format!("{} {}", &compact[..split], &compact[split..])
    } else {
        value.trim().to_ascii_uppercase()
    }
}
