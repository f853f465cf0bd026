//! Plain-text previews of markup content.
//!
//! This is a best-effort preview builder, not an HTML sanitizer. Output is
//! meant for text rendering only.

use regex::Regex;
use std::sync::LazyLock;

/// Appended to a snippet that was cut short.
pub const ELLIPSIS: &str = "...";

/// A complete `<...>` tag, or a lone bracket left over outside one.
static MARKUP: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>|[<>]").ok());

/// Remove `<...>` tags. A `<` with no closing `>` after it, and any `>` outside
/// a tag, is dropped as well, so the result never contains angle brackets.
pub fn strip_markup(input: &str) -> String {
    match MARKUP.as_ref() {
        Some(re) => re.replace_all(input, "").into_owned(),
        None => input.replace(['<', '>'], ""),
    }
}

/// Collapse whitespace runs into one space and trim both ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Markup-free preview of at most `max_chars` characters, plus [`ELLIPSIS`]
/// when the text was longer.
pub fn snippet(input: &str, max_chars: usize) -> String {
    let plain = collapse_whitespace(&strip_markup(input));
    if plain.chars().count() <= max_chars {
        return plain;
    }
    let mut cut: String = plain.chars().take(max_chars).collect();
    cut.push_str(ELLIPSIS);
    cut
}
