//! Input alphabet validation
//!
//! The breakers accept letters, digits, the space and a small set of
//! punctuation. Anything else is replaced before breaking, and the caller
//! gets a warning naming what was replaced.

use tracing::warn;

/// Punctuation allowed alongside letters, digits and the space
pub const ALLOWED_PUNCTUATION: &str = ".,;:?!'\"-()";

/// Character substituted for anything outside the allowed set
pub const REPLACEMENT: char = ' ';

/// At most this many distinct rejected characters are named in a warning
const MAX_LISTED: usize = 10;

pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || ALLOWED_PUNCTUATION.contains(c)
}

/// Replaces every disallowed character with `replacement`, or returns the
/// text untouched when `keep_unknown` is set.
pub fn filter_charset(text: &str, keep_unknown: bool, replacement: char) -> String {
    if keep_unknown {
        return text.to_string();
    }
    text.chars()
        .map(|c| if is_allowed_char(c) { c } else { replacement })
        .collect()
}

/// Result of [`validate_and_filter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetReport {
    /// True when the input contained only allowed characters
    pub is_valid: bool,
    pub filtered: String,
    /// Number of characters that were replaced
    pub invalid_count: usize,
    /// Distinct rejected characters, sorted
    pub invalid_chars: Vec<char>,
    pub warning: Option<String>,
}

/// Filters `text` and reports what was replaced.
pub fn validate_and_filter(text: &str) -> CharsetReport {
    let mut invalid_chars: Vec<char> = text.chars().filter(|&c| !is_allowed_char(c)).collect();
    let invalid_count = invalid_chars.len();
    invalid_chars.sort_unstable();
    invalid_chars.dedup();

    let filtered = filter_charset(text, false, REPLACEMENT);

    if invalid_count == 0 {
        return CharsetReport {
            is_valid: true,
            filtered,
            invalid_count,
            invalid_chars,
            warning: None,
        };
    }

    let listed: Vec<String> = invalid_chars
        .iter()
        .take(MAX_LISTED)
        .map(|c| format!("{:?}", c))
        .collect();
    let warning = format!(
        "Found {} character(s) outside the allowed set (a-z, A-Z, 0-9, space, {}). \
         They were replaced with spaces. Rejected: {}",
        invalid_count,
        ALLOWED_PUNCTUATION,
        listed.join(", ")
    );
    warn!(invalid_count, "charset filter replaced characters");

    CharsetReport {
        is_valid: false,
        filtered,
        invalid_count,
        invalid_chars,
        warning: Some(warning),
    }
}

/// Human-readable description of the allowed set.
pub fn charset_info() -> &'static str {
    "Allowed characters:\n\
     - Letters: a-z, A-Z\n\
     - Digits: 0-9\n\
     - Space\n\
     - Punctuation: . , ; : ? ! ' \" - ( )\n\
     Any other character is replaced with a space."
}
