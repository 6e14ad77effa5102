//! Host events - Notifications the chat host sends about its transcript
//!
//! The host owns messages and characters; these events are the only way the
//! engine learns that something changed and a render pass is due.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    // ========================================================================
    // Message Events
    // ========================================================================
    /// A user message finished rendering
    UserMessageRendered { message_id: MessageId },

    /// An assistant message finished rendering
    CharacterMessageRendered { message_id: MessageId },

    /// A message was edited
    MessageUpdated { message_id: MessageId },

    /// An alternative reply was swiped in
    MessageSwiped { message_id: MessageId },

    /// Older messages were loaded into view
    MoreMessagesLoaded,

    // ========================================================================
    // Generation Events
    // ========================================================================
    GenerationEnded,

    GenerationStopped,

    // ========================================================================
    // Chat / Character Events
    // ========================================================================
    /// Another chat (and possibly another character) was opened
    ChatChanged,

    CharacterRenamed { old_key: String, new_key: String },

    CharacterDeleted { character_key: String },

    /// Extensions finished their first load
    FirstLoad,
}

impl HostEvent {
    /// The message this event is about, if any
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            Self::UserMessageRendered { message_id }
            | Self::CharacterMessageRendered { message_id }
            | Self::MessageUpdated { message_id }
            | Self::MessageSwiped { message_id } => Some(*message_id),
            _ => None,
        }
    }
}
