//! Chat log port - read access to the host's transcript
//!
//! The host owns the messages; the engine only ever reads snapshots.

use async_trait::async_trait;

use crate::domain::entities::ChatMessage;
use crate::domain::value_objects::MessageId;

#[async_trait]
pub trait ChatLogPort: Send + Sync {
    /// Snapshot of one message, `None` if it does not exist
    async fn get_message(&self, id: MessageId) -> Option<ChatMessage>;

    /// Ids of every message in transcript order
    async fn message_ids(&self) -> Vec<MessageId>;

    /// Id of the newest message
    async fn last_message_id(&self) -> Option<MessageId> {
        self.message_ids().await.last().copied()
    }

    /// Key (avatar) of the character whose chat is open
    async fn active_character(&self) -> Option<String>;
}
