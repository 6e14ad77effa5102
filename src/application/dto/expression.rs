use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::AddEntryRequest;
use crate::domain::entities::ImageEntry;
use crate::domain::value_objects::EntryId;

// ============================================================================
// Request DTOs
// ============================================================================

/// An image the host asset store already saved
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExpressionRequestDto {
    pub file_name: String,
    pub content_type: String,
    pub url: String,
}

impl From<AddExpressionRequestDto> for AddEntryRequest {
    fn from(value: AddExpressionRequestDto) -> Self {
        Self {
            file_name: value.file_name,
            content_type: value.content_type,
            url: value.url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameExpressionRequestDto {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCharacterRequestDto {
    pub old_key: String,
    pub new_key: String,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionResponseDto {
    pub id: EntryId,
    pub name: String,
    pub url: String,
    pub original_name: String,
    pub added_at: DateTime<Utc>,
    /// Character prefix of the name, empty for generic entries
    pub character: String,
    pub expression: String,
}

impl From<&ImageEntry> for ExpressionResponseDto {
    fn from(entry: &ImageEntry) -> Self {
        let parsed = entry.parsed_name();
        Self {
            id: entry.id,
            name: entry.name.clone(),
            url: entry.url.clone(),
            original_name: entry.original_name.clone(),
            added_at: entry.added_at,
            character: parsed.character,
            expression: parsed.expression,
        }
    }
}

impl From<ImageEntry> for ExpressionResponseDto {
    fn from(entry: ImageEntry) -> Self {
        Self::from(&entry)
    }
}
