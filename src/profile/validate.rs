//! Company-name validation, enforced identically client-side and mirrored
//! server-side. First failing rule wins.

use std::sync::LazyLock;

use regex::Regex;

pub const COMPANY_MAX_LEN: usize = 100;
pub const COMPANY_TOO_LONG: &str = "Company name is too long (max 100 chars).";
pub const COMPANY_INVALID_CHARS: &str = "Company name contains invalid characters.";

/// Word characters, spaces, hyphens, apostrophes, periods, commas, and
/// ampersands only.
static COMPANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w \-'.,&]+$").expect("company regex"));

/// Validate a company name. Returns the error message for the first
/// failing rule, or `None` when valid. Empty is valid (no-op).
pub fn validate_company(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return None;
    }
    if name.chars().count() > COMPANY_MAX_LEN {
        return Some(COMPANY_TOO_LONG);
    }
    if name
        .chars()
        .any(|c| matches!(c, '*' | '<' | '>' | '\\') || (c as u32) < 0x20)
    {
        return Some(COMPANY_INVALID_CHARS);
    }
    if !COMPANY_RE.is_match(name) {
        return Some(COMPANY_INVALID_CHARS);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_valid() {
        assert_eq!(validate_company(""), None);
    }

    #[test]
    fn ordinary_names_pass() {
        assert_eq!(validate_company("Acme, Inc."), None);
        assert_eq!(validate_company("Sweet Treats"), None);
        assert_eq!(validate_company("O'Brien & Sons - East"), None);
    }

    #[test]
    fn too_long_wins_first() {
        let name = "A".repeat(101);
        assert_eq!(validate_company(&name), Some(COMPANY_TOO_LONG));
        let edge = "A".repeat(100);
        assert_eq!(validate_company(&edge), None);
    }

    #[test]
    fn blocked_characters_are_rejected() {
        assert_eq!(validate_company("Bad<Name>"), Some(COMPANY_INVALID_CHARS));
        assert_eq!(validate_company("star*co"), Some(COMPANY_INVALID_CHARS));
        assert_eq!(validate_company("back\\slash"), Some(COMPANY_INVALID_CHARS));
        assert_eq!(validate_company("tab\tco"), Some(COMPANY_INVALID_CHARS));
    }

    #[test]
    fn characters_outside_the_allowed_class_are_rejected() {
        assert_eq!(validate_company("name!"), Some(COMPANY_INVALID_CHARS));
        assert_eq!(validate_company("a/b"), Some(COMPANY_INVALID_CHARS));
    }

    #[test]
    fn length_is_checked_before_characters() {
        let name = format!("{}<", "A".repeat(101));
        assert_eq!(validate_company(&name), Some(COMPANY_TOO_LONG));
    }
}
