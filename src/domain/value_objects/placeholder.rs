//! Placeholder tokens - `{{img::<name>}}`
//!
//! The tag is matched case-insensitively and the name is captured up to the
//! first `}}`. Tokens inside fenced or inline code are left alone.

use std::collections::HashSet;
use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"(?i)\{\{img::(.*?)\}\}").expect("valid placeholder pattern");
    static ref FENCED_CODE: Regex =
        Regex::new(r"(?s)```.*?(?:```|\z)").expect("valid fenced code pattern");
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`\n]+`").expect("valid inline code pattern");
}

/// A placeholder found in message text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch {
    /// Byte range of the whole token
    pub range: Range<usize>,
    /// The token exactly as written
    pub token: String,
    /// The captured name, untrimmed
    pub raw_name: String,
}

pub fn build_placeholder(name: &str) -> String {
    format!("{{{{img::{}}}}}", name)
}

/// Byte ranges of fenced and inline code, sorted by start
pub fn code_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = FENCED_CODE.find_iter(text).map(|m| m.range()).collect();
    let inline: Vec<Range<usize>> = INLINE_CODE
        .find_iter(text)
        .map(|m| m.range())
        .filter(|r| !spans.iter().any(|s| s.start <= r.start && r.start < s.end))
        .collect();
    spans.extend(inline);
    spans.sort_by_key(|r| r.start);
    spans
}

fn inside_code(spans: &[Range<usize>], range: &Range<usize>) -> bool {
    spans
        .iter()
        .any(|s| s.start <= range.start && range.end <= s.end)
}

/// Placeholders outside code, in text order
pub fn find_placeholders(text: &str) -> Vec<PlaceholderMatch> {
    let spans = code_spans(text);
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let range = whole.range();
            if inside_code(&spans, &range) {
                return None;
            }
            Some(PlaceholderMatch {
                range,
                token: whole.as_str().to_string(),
                raw_name: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
            })
        })
        .collect()
}

/// Whether any placeholder appears anywhere in the text, code included
pub fn contains_placeholder(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// Drop every repeat of a placeholder token, keeping the first occurrence.
///
/// Tokens compare case-insensitively.
pub fn dedupe_placeholders(text: &str) -> String {
    let mut seen = HashSet::new();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for found in find_placeholders(text) {
        if seen.insert(found.token.to_lowercase()) {
            continue;
        }
        out.push_str(&text[last..found.range.start]);
        last = found.range.end;
    }
    out.push_str(&text[last..]);
    out
}
