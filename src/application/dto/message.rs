use serde::{Deserialize, Serialize};

use crate::application::dto::expression::ExpressionResponseDto;
use crate::application::services::RenderedMessage;
use crate::domain::entities::{ChatMessage, MessageRole};
use crate::domain::services::{Placement, RenderSegment};
use crate::domain::value_objects::{EntryId, MessageId};

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AppendMessageRequestDto {
    pub role: MessageRole,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessageRequestDto {
    pub text: String,
}

/// Open another chat; `None` closes the character chat
#[derive(Debug, Deserialize)]
pub struct SetCharacterRequestDto {
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlacementQueryDto {
    /// Allow a second character image; defaults to the stored toggle
    #[serde(default)]
    pub multiple: Option<bool>,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponseDto {
    pub id: MessageId,
    pub role: MessageRole,
    pub text: String,
}

impl From<ChatMessage> for MessageResponseDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            role: message.role,
            text: message.text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDto {
    pub entry: ExpressionResponseDto,
    /// Character position in the message text
    pub target_offset: usize,
}

impl From<Placement> for PlacementDto {
    fn from(placement: Placement) -> Self {
        Self {
            entry: ExpressionResponseDto::from(&placement.entry),
            target_offset: placement.char_offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderSegmentDto {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        entry_id: EntryId,
        url: String,
        placeholder: String,
        label: String,
    },
}

impl From<RenderSegment> for RenderSegmentDto {
    fn from(segment: RenderSegment) -> Self {
        match segment {
            RenderSegment::Text(text) => Self::Text { text },
            RenderSegment::Image {
                entry,
                placeholder,
                label,
            } => Self::Image {
                entry_id: entry.id,
                url: entry.url,
                placeholder,
                label,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessageDto {
    pub message_id: MessageId,
    pub text: String,
    pub segments: Vec<RenderSegmentDto>,
    pub injected: Vec<PlacementDto>,
}

impl From<RenderedMessage> for RenderedMessageDto {
    fn from(rendered: RenderedMessage) -> Self {
        Self {
            message_id: rendered.message_id,
            text: rendered.text,
            segments: rendered.segments.into_iter().map(Into::into).collect(),
            injected: rendered.injected.into_iter().map(Into::into).collect(),
        }
    }
}
