//! Entry selection - which registered image represents a character

use regex::Regex;

use crate::domain::entities::ImageEntry;
use crate::domain::value_objects::{
    candidate_words, search_haystack, search_needle, strip_punctuation, ParsedName,
};

/// Key of the bucket holding entries without a character prefix
pub const DEFAULT_BUCKET: &str = "";

/// Entries grouped by the character token of their name, in registration order
#[derive(Debug, Clone, Default)]
pub struct EntryGroups<'e> {
    groups: Vec<(String, Vec<&'e ImageEntry>)>,
}

impl<'e> EntryGroups<'e> {
    pub fn from_entries(entries: &'e [ImageEntry]) -> Self {
        let mut groups: Vec<(String, Vec<&'e ImageEntry>)> = Vec::new();
        for entry in entries {
            let key = entry.parsed_name().character;
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(entry),
                None => groups.push((key, vec![entry])),
            }
        }
        Self { groups }
    }

    pub fn get(&self, character_key: &str) -> Option<&[&'e ImageEntry]> {
        self.groups
            .iter()
            .find(|(k, _)| k == character_key)
            .map(|(_, members)| members.as_slice())
    }

    /// Character tokens that can be scored, without the default bucket
    pub fn character_keys(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|(k, _)| k)
            .filter(|k| k.as_str() != DEFAULT_BUCKET)
            .cloned()
            .collect()
    }

    /// The only group, if there is exactly one
    pub fn sole_group(&self) -> Option<&[&'e ImageEntry]> {
        match self.groups.as_slice() {
            [(_, members)] => Some(members.as_slice()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Pick the entry of `character_key` that best fits the message.
///
/// The first entry whose normalized name or expression appears in the message
/// wins; otherwise the first registered entry of the character.
pub fn select_for_character<'e>(
    groups: &EntryGroups<'e>,
    character_key: &str,
    message_text: &str,
) -> Option<&'e ImageEntry> {
    let members = groups.get(character_key)?;
    let haystack = search_haystack(message_text);

    members
        .iter()
        .copied()
        .find(|entry| {
            let parsed = entry.parsed_name();
            [search_needle(&parsed.raw), search_needle(&parsed.expression)]
                .iter()
                .any(|needle| !needle.is_empty() && haystack.contains(needle.as_str()))
        })
        .or_else(|| members.first().copied())
}

/// Scan every entry, ignoring groups, for one whose name, expression or
/// character token appears in the message.
pub fn find_direct_match<'e>(entries: &'e [ImageEntry], message_text: &str) -> Option<&'e ImageEntry> {
    let haystack = search_haystack(message_text);

    entries.iter().find(|entry| {
        let parsed = entry.parsed_name();
        [
            search_needle(&parsed.raw),
            search_needle(&parsed.expression),
            search_needle(&parsed.character),
        ]
        .iter()
        .any(|needle| !needle.is_empty() && haystack.contains(needle.as_str()))
    })
}

/// Byte offset in `text` where the entry's name, expression or character is
/// first written.
pub fn mention_offset(text: &str, entry: &ImageEntry) -> Option<usize> {
    let stripped = strip_punctuation(text);
    let parsed: ParsedName = entry.parsed_name();

    let found = [parsed.raw.as_str(), parsed.expression.as_str(), parsed.character.as_str()]
        .into_iter()
        .find_map(|name| {
            let words: Vec<String> = candidate_words(&strip_punctuation(name))
                .iter()
                .map(|w| regex::escape(w))
                .collect();
            if words.is_empty() {
                return None;
            }
            let pattern = Regex::new(&format!("(?i){}", words.join(r"[\s_]+"))).ok()?;
            pattern.find(&stripped).map(|m| m.start())
        });
    found
}
