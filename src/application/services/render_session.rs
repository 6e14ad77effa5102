//! Render session - per-chat state for scheduling render passes

use crate::domain::entities::ChatMessage;
use crate::domain::value_objects::MessageId;

/// Tracks the newest assistant message seen in the open chat.
///
/// Generation-ended signals carry no message id, so the session supplies the
/// message to render. Reset whenever the chat changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSession {
    last_assistant_message: Option<MessageId>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `message` if it is an assistant message
    pub fn remember(&mut self, message: &ChatMessage) {
        if message.is_assistant() {
            self.last_assistant_message = Some(message.id);
        }
    }

    pub fn last_assistant_message(&self) -> Option<MessageId> {
        self.last_assistant_message
    }

    pub fn reset(&mut self) {
        self.last_assistant_message = None;
    }
}
