//! Text Sanitization
//!
//! Strips markup-like fragments from free text before it is stored or shown
//! again. This is a heuristic filter, not an HTML sanitizer.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Maximum length of sanitized text, in characters.
pub const MAX_SANITIZED_CHARS: usize = 10_000;

fn unsafe_fragments() -> &'static [Regex] {
    static FRAGMENTS: OnceLock<Vec<Regex>> = OnceLock::new();
    FRAGMENTS.get_or_init(|| {
        [r"[<>]", r"(?i)javascript:", r"(?i)on\w+="]
            .into_iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    })
}

/// Remove angle brackets, `javascript:` prefixes and `on*=` attributes, then
/// trim and cap the length.
pub fn sanitize_text(input: &str) -> String {
    let mut text = input.to_string();
    for fragment in unsafe_fragments() {
        if fragment.is_match(&text) {
            text = fragment.replace_all(&text, "").into_owned();
        }
    }
    text.trim().chars().take(MAX_SANITIZED_CHARS).collect()
}

/// Apply [`sanitize_text`] to every string leaf, keeping structure and
/// non-string leaves unchanged.
pub fn sanitize_tree(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(sanitize_text(&text)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_tree).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, sanitize_tree(value)))
                .collect(),
        ),
        other => other,
    }
}
