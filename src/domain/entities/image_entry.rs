//! Image entry entity - one registered expression image of a chat character

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{normalize_name, EntryId, ParsedName};

/// A user-registered expression image
///
/// Entries live inside the settings blob owned by the host, which is why the
/// entity carries serde derives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub id: EntryId,
    /// Display name, e.g. `alice/smile` or `grin`
    pub name: String,
    /// Where the host stored the uploaded image
    pub url: String,
    /// File name of the original upload
    #[serde(default)]
    pub original_name: String,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl ImageEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            url: url.into(),
            original_name: String::new(),
            added_at: Utc::now(),
        }
    }

    pub fn with_original_name(mut self, original_name: impl Into<String>) -> Self {
        self.original_name = original_name.into();
        self
    }

    pub fn parsed_name(&self) -> ParsedName {
        ParsedName::parse(&self.name)
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether the entry can be drawn
    pub fn has_image(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
