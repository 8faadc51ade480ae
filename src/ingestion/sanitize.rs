//! # Markup Stripping
//!
//! Message texts exported from web forms carry HTML tags and `&nbsp;` entities.
//! They are removed unconditionally; no other normalization happens here.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

const MARKUP_PATTERN: &str = r"<[^>]*>|&nbsp;";

fn markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(MARKUP_PATTERN).expect("markup pattern is a valid regex"))
}

/// Remove every angle-bracket tag and `&nbsp;` entity from `text`
///
/// Stripping repeats until nothing matches, so a removal can never splice
/// together a new tag or entity (`&nb&nbsp;sp;` yields an empty string).
pub fn strip_markup(text: &str) -> String {
    let pattern = markup_pattern();
    let mut current = match pattern.replace_all(text, "") {
        Cow::Borrowed(unchanged) => return unchanged.to_string(),
        Cow::Owned(stripped) => stripped,
    };

    // Every pass removes at least one character, so this terminates
    while let Cow::Owned(stripped) = pattern.replace_all(&current, "") {
        current = stripped;
    }
    current
}

/// Whether `text` still contains anything the stripper would remove
pub fn contains_markup(text: &str) -> bool {
    markup_pattern().is_match(text)
}
