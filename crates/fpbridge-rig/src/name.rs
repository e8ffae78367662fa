//! Duplicate-suffix handling for bone names.
//!
//! Importing the same skeleton more than once yields names such as
//! `spine_01.001`. Stripping a trailing `.` followed by exactly three digits
//! gives the canonical name used as the dedup key during merging.

use std::sync::LazyLock;

use regex::Regex;

static DUPLICATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[0-9]{3}$").expect("duplicate suffix pattern is valid"));

/// Strip one trailing duplicate suffix (`.` plus exactly three ASCII digits).
///
/// ```
/// use fpbridge_rig::canonical_name;
///
/// assert_eq!(canonical_name("spine_01.002"), "spine_01");
/// assert_eq!(canonical_name("spine_01"), "spine_01");
/// assert_eq!(canonical_name("hand.0001"), "hand.0001");
/// ```
pub fn canonical_name(name: &str) -> &str {
    match DUPLICATE_SUFFIX.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// Whether `name` carries a duplicate suffix.
pub fn has_duplicate_suffix(name: &str) -> bool {
    DUPLICATE_SUFFIX.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_exactly_three_digits() {
        assert_eq!(canonical_name("A.001"), "A");
        assert_eq!(canonical_name("A.999"), "A");
        assert_eq!(canonical_name("A.01"), "A.01");
        assert_eq!(canonical_name("A.0001"), "A.0001");
        assert_eq!(canonical_name("A001"), "A001");
    }

    #[test]
    fn test_only_one_suffix_is_removed() {
        assert_eq!(canonical_name("A.001.002"), "A.001");
    }

    #[test]
    fn test_suffix_must_be_trailing() {
        assert_eq!(canonical_name("A.001_end"), "A.001_end");
        assert_eq!(canonical_name(".001"), "");
    }

    #[test]
    fn test_non_ascii_digits_are_not_a_suffix() {
        assert_eq!(canonical_name("A.\u{0661}\u{0662}\u{0663}"), "A.\u{0661}\u{0662}\u{0663}");
        assert!(!has_duplicate_suffix("head"));
        assert!(has_duplicate_suffix("head.004"));
    }
}
