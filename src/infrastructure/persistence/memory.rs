//! In-memory adapters
//!
//! Stand-ins for the host's chat transcript and settings store. The server uses
//! the chat log as its transcript mirror; tests use both.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{ChatLogPort, SettingsError, SettingsRepositoryPort};
use crate::domain::entities::{ChatMessage, MessageRole};
use crate::domain::value_objects::{EmbedSettings, MessageId};

#[derive(Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<EmbedSettings>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepositoryPort for InMemorySettingsRepository {
    async fn get(&self) -> Result<EmbedSettings, SettingsError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &EmbedSettings) -> Result<(), SettingsError> {
        *self.settings.write().await = settings.clone();
        Ok(())
    }

    async fn reset(&self) -> Result<EmbedSettings, SettingsError> {
        let settings = EmbedSettings::default();
        *self.settings.write().await = settings.clone();
        Ok(settings)
    }
}

#[derive(Default)]
struct ChatState {
    character: Option<String>,
    messages: Vec<ChatMessage>,
}

/// Transcript of the open chat, addressed by message index
pub struct InMemoryChatLog {
    state: RwLock<ChatState>,
}

impl InMemoryChatLog {
    pub fn new(character: Option<String>) -> Self {
        Self {
            state: RwLock::new(ChatState {
                character,
                messages: Vec::new(),
            }),
        }
    }

    /// Replace the open chat with an empty one for `character`
    pub async fn open_chat(&self, character: Option<String>) {
        let mut state = self.state.write().await;
        state.character = character;
        state.messages.clear();
    }

    pub async fn append(&self, role: MessageRole, text: impl Into<String>) -> MessageId {
        let mut state = self.state.write().await;
        let id = MessageId::new(state.messages.len());
        state.messages.push(ChatMessage::new(id, role, text));
        id
    }

    /// Replace the text of a message, `None` if it does not exist
    pub async fn update(&self, id: MessageId, text: impl Into<String>) -> Option<ChatMessage> {
        let mut state = self.state.write().await;
        let message = state.messages.get_mut(id.index())?;
        message.text = text.into();
        Some(message.clone())
    }
}

#[async_trait]
impl ChatLogPort for InMemoryChatLog {
    async fn get_message(&self, id: MessageId) -> Option<ChatMessage> {
        self.state.read().await.messages.get(id.index()).cloned()
    }

    async fn message_ids(&self) -> Vec<MessageId> {
        self.state.read().await.messages.iter().map(|m| m.id).collect()
    }

    async fn active_character(&self) -> Option<String> {
        self.state.read().await.character.clone()
    }
}
