//! Whole-word pattern construction
//!
//! A `\b` anchor is only emitted on a side where the literal starts or ends
//! with a word character. `\bM/M \(Paris\)\b` could never match before a
//! space, so that side is left unanchored.

use regex::{Regex, RegexBuilder};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Regex source for a whole-word occurrence of `literal`
pub fn whole_word_pattern(literal: &str) -> String {
    let lead = literal.chars().next().is_some_and(is_word_char);
    let tail = literal.chars().next_back().is_some_and(is_word_char);
    format!(
        "{}{}{}",
        if lead { r"\b" } else { "" },
        regex::escape(literal),
        if tail { r"\b" } else { "" }
    )
}

/// Compile a whole-word matcher for `literal`
pub fn whole_word_regex(literal: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&whole_word_pattern(literal))
        .case_insensitive(case_insensitive)
        .build()
}
