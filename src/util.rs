//! Text comparison helpers shared by the agents.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

/// Case-insensitive equality. Two absent values are equal; absent never equals present.
pub fn equals_insensitive(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => fold(a) == fold(b),
        _ => false,
    }
}

/// Case-insensitive ordering. Values differing only by case compare equal.
pub fn compare_insensitive(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b))
}

/// Lookup key for emails: trimmed and lower-cased.
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lookup key for display names: NFC-normalized, whitespace-collapsed, lower-cased.
pub fn name_key(name: &str) -> String {
    name.nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn fold(s: &str) -> String {
    s.nfc().collect::<String>().to_lowercase()
}
