//! Expression embed settings value object
//!
//! The settings blob belongs to the host application; this crate only reads and
//! writes it through the settings port. The serde shape mirrors what the host
//! persists, so it keeps camelCase keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::ImageEntry;

/// Entries registered for one character
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CharacterEntries {
    #[serde(default)]
    pub entries: Vec<ImageEntry>,
}

/// All expression embed settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbedSettings {
    /// Entry lists keyed by character avatar
    #[serde(default)]
    pub characters: BTreeMap<String, CharacterEntries>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Allow up to two characters to be attributed per message
    #[serde(default)]
    pub double_enabled: bool,
    /// Pre per-character global entry list, migrated on first use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<ImageEntry>>,
}

fn default_enabled() -> bool {
    true
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            characters: BTreeMap::new(),
            enabled: true,
            double_enabled: false,
            entries: None,
        }
    }
}

impl EmbedSettings {
    /// Entries of a character in registration order
    pub fn entries_for(&self, character_key: &str) -> &[ImageEntry] {
        self.characters
            .get(character_key)
            .map(|c| c.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Mutable entry list of a character, created on demand
    pub fn entries_for_mut(&mut self, character_key: &str) -> &mut Vec<ImageEntry> {
        &mut self
            .characters
            .entry(character_key.to_string())
            .or_default()
            .entries
    }

    /// Move the legacy global list onto `character_key` if that character has
    /// no entries yet. Returns true when something changed.
    pub fn migrate_legacy_entries(&mut self, character_key: &str) -> bool {
        let has_legacy = self.entries.as_ref().is_some_and(|e| !e.is_empty());
        if !has_legacy || !self.entries_for(character_key).is_empty() {
            return false;
        }

        let legacy = self.entries.take().unwrap_or_default();
        *self.entries_for_mut(character_key) = legacy;
        true
    }

    /// Re-key a character's entries after the host renamed its avatar
    pub fn rename_character(&mut self, old_key: &str, new_key: &str) -> bool {
        match self.characters.remove(old_key) {
            Some(entries) => {
                self.characters.insert(new_key.to_string(), entries);
                true
            }
            None => false,
        }
    }

    pub fn remove_character(&mut self, character_key: &str) -> bool {
        self.characters.remove(character_key).is_some()
    }
}
