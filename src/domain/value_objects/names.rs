//! Entry name parsing and text normalization
//!
//! Entry names are free text typed by the user. A name such as `alice/smile`,
//! `alice-smile` or `alice smile` carries a character prefix and an expression;
//! a bare `smile` carries only an expression.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref NAME_SPLIT: Regex =
        Regex::new(r"(?s)^([^\s/\\|\-_]+)[\s/\\|\-_]+(.+)$").expect("valid name split pattern");
    static ref NORMALIZE_SEPARATORS: Regex =
        Regex::new(r"[\\/\s]+").expect("valid separator pattern");
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
}

/// Derived view of an entry name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    /// The name exactly as registered
    pub raw: String,
    /// Normalized character prefix, empty when the name has no separator
    pub character: String,
    /// Remainder after the separator, or the raw name when there was no split
    pub expression: String,
    /// Normalized form of the whole raw name
    pub normalized: String,
}

impl ParsedName {
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        let (character, expression) = match NAME_SPLIT.captures(trimmed) {
            Some(caps) => (normalize_name(&caps[1]), caps[2].to_string()),
            None => (String::new(), name.to_string()),
        };

        Self {
            raw: name.to_string(),
            character,
            expression,
            normalized: normalize_name(name),
        }
    }

    pub fn has_character(&self) -> bool {
        !self.character.is_empty()
    }

    /// Normalized expression token
    pub fn normalized_expression(&self) -> String {
        normalize_name(&self.expression)
    }
}

/// Lower-case a name and fold slashes, backslashes and whitespace runs into `_`.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    NORMALIZE_SEPARATORS.replace_all(&lowered, "_").into_owned()
}

/// The form of a normalized name used when searching message text.
pub fn search_needle(name: &str) -> String {
    normalize_name(name).replace('_', " ").trim().to_string()
}

/// Replace every character that is neither a word character nor whitespace
/// with spaces, keeping byte offsets aligned with the input.
pub fn strip_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
            out.push(c);
        } else {
            for _ in 0..c.len_utf8() {
                out.push(' ');
            }
        }
    }
    out
}

/// Lower-cased, punctuation-stripped text with whitespace runs collapsed.
///
/// Offsets are not preserved; only use this for containment checks.
pub fn search_haystack(text: &str) -> String {
    let stripped = strip_punctuation(text).to_lowercase();
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Turn a candidate character token back into space-separated words.
pub fn candidate_words(candidate: &str) -> Vec<String> {
    candidate
        .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '/' | '\\' | '|'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character_and_expression() {
        let parsed = ParsedName::parse("Alice/Smile");
        assert_eq!(parsed.character, "alice");
        assert_eq!(parsed.expression, "Smile");
        assert_eq!(parsed.normalized, "alice_smile");

        let parsed = ParsedName::parse("bob-frown");
        assert_eq!(parsed.character, "bob");
        assert_eq!(parsed.expression, "frown");

        let parsed = ParsedName::parse("carol | very happy");
        assert_eq!(parsed.character, "carol");
        assert_eq!(parsed.expression, "very happy");
    }

    #[test]
    fn test_parse_plain_expression() {
        let parsed = ParsedName::parse("grin");
        assert!(!parsed.has_character());
        assert_eq!(parsed.expression, "grin");
        assert_eq!(parsed.normalized, "grin");
    }

    #[test]
    fn test_parse_degenerate_names() {
        let parsed = ParsedName::parse("");
        assert_eq!(parsed.character, "");
        assert_eq!(parsed.expression, "");

        // Separator with nothing after it is not a split
        let parsed = ParsedName::parse("alice/");
        assert_eq!(parsed.character, "");
        assert_eq!(parsed.expression, "alice/");

        let parsed = ParsedName::parse("_smile");
        assert_eq!(parsed.character, "");
        assert_eq!(parsed.expression, "_smile");
    }

    #[test]
    fn test_expression_never_empty_for_non_empty_name() {
        for name in ["a", " ", "/", "a/b", "--", "x y z", "Ünïcode/ß", "\t"] {
            assert!(!ParsedName::parse(name).expression.is_empty(), "name {:?}", name);
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Alice  Smile "), "alice_smile");
        assert_eq!(normalize_name("a\\b/c"), "a_b_c");
        assert_eq!(normalize_name("keep-hyphen"), "keep-hyphen");
        assert_eq!(search_needle("Alice/Smile"), "alice smile");
    }

    #[test]
    fn test_strip_punctuation_keeps_offsets() {
        let text = "Alice: “Hi!”";
        let stripped = strip_punctuation(text);
        assert_eq!(stripped.len(), text.len());
        assert!(stripped.starts_with("Alice "));
        assert_eq!(search_haystack("Hello,   World!!"), "hello world");
    }

    #[test]
    fn test_candidate_words() {
        assert_eq!(candidate_words("mary_jane"), vec!["mary", "jane"]);
        assert_eq!(candidate_words(" bob "), vec!["bob"]);
        assert!(candidate_words("__").is_empty());
    }
}
