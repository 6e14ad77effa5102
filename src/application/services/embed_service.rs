//! Embed Service - Attributes messages to characters and renders their images
//!
//! This service drives the attribution core against live host data: it
//! snapshots a message and the open character's entries, plans placements,
//! inserts placeholders into assistant messages that have none, and renders
//! placeholders into image segments. The host text is never modified, so every
//! pass starts from the original message.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ports::outbound::{ChatLogPort, SettingsError};
use crate::application::services::expression_library_service::ExpressionLibraryService;
use crate::application::services::render_session::RenderSession;
use crate::application::services::settings_service::SettingsService;
use crate::domain::entities::ChatMessage;
use crate::domain::events::HostEvent;
use crate::domain::services::{
    inject_placeholders, render_segments, Placement, PlacementPlanner, RenderSegment,
};
use crate::domain::value_objects::{
    contains_placeholder, AttributionTuning, MessageId, ScoringLexicon,
};

/// Output of one render pass over a message
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub message_id: MessageId,
    /// Message text with any auto-inserted placeholders
    pub text: String,
    pub segments: Vec<RenderSegment>,
    /// Placements that were auto-inserted in this pass
    pub injected: Vec<Placement>,
}

pub struct EmbedService {
    chat: Arc<dyn ChatLogPort>,
    library: Arc<ExpressionLibraryService>,
    settings: Arc<SettingsService>,
    lexicon: Arc<ScoringLexicon>,
    tuning: AttributionTuning,
}

impl EmbedService {
    pub fn new(
        chat: Arc<dyn ChatLogPort>,
        library: Arc<ExpressionLibraryService>,
        settings: Arc<SettingsService>,
        lexicon: Arc<ScoringLexicon>,
        tuning: AttributionTuning,
    ) -> Self {
        Self {
            chat,
            library,
            settings,
            lexicon,
            tuning,
        }
    }

    fn planner(&self) -> PlacementPlanner<'_> {
        PlacementPlanner::new(&self.lexicon, &self.tuning)
    }

    /// Plan which entries belong in a message and where
    #[instrument(skip(self))]
    pub async fn pick_entries_for_message(
        &self,
        message_id: MessageId,
        allow_multiple: bool,
    ) -> Vec<Placement> {
        let message = self.chat.get_message(message_id).await;
        let entries = self.library.active_entries().await;
        self.planner()
            .pick_entries_for_message(message.as_ref(), &entries, allow_multiple)
    }

    /// Render one message, auto-inserting placeholders when it has none
    #[instrument(skip(self))]
    pub async fn process_message(&self, message_id: MessageId) -> Option<RenderedMessage> {
        let message = self.chat.get_message(message_id).await?;
        let entries = self.library.active_entries().await;
        let settings = self.settings.get().await;

        let mut text = message.text.clone();
        let mut injected = Vec::new();
        if settings.enabled && should_auto_inject(&message) {
            injected = self.planner().pick_entries_for_message(
                Some(&message),
                &entries,
                settings.double_enabled,
            );
            if !injected.is_empty() {
                debug!(count = injected.len(), "Inserting expression placeholders");
                text = inject_placeholders(&text, &injected);
            }
        }

        let segments = render_segments(&text, &entries);
        Some(RenderedMessage {
            message_id,
            text,
            segments,
            injected,
        })
    }

    /// Render every message of the open chat
    pub async fn refresh_all(&self) -> Vec<RenderedMessage> {
        let mut rendered = Vec::new();
        for id in self.chat.message_ids().await {
            if let Some(message) = self.process_message(id).await {
                rendered.push(message);
            }
        }
        rendered
    }

    /// Remember the message in the session and render it
    pub async fn schedule_render(
        &self,
        session: &mut RenderSession,
        message_id: MessageId,
    ) -> Option<RenderedMessage> {
        let message = self.chat.get_message(message_id).await?;
        session.remember(&message);
        self.process_message(message_id).await
    }

    /// The message a generation signal refers to: the remembered assistant
    /// message if it still exists, else the newest message.
    pub async fn active_assistant_message(&self, session: &RenderSession) -> Option<MessageId> {
        if let Some(id) = session.last_assistant_message() {
            if self.chat.get_message(id).await.is_some() {
                return Some(id);
            }
        }
        self.chat.last_message_id().await
    }

    /// React to a host notification, returning whatever was re-rendered
    #[instrument(skip(self, session))]
    pub async fn handle_event(
        &self,
        session: &mut RenderSession,
        event: HostEvent,
    ) -> Result<Vec<RenderedMessage>, SettingsError> {
        let rendered: Vec<RenderedMessage> = match event {
            HostEvent::UserMessageRendered { message_id }
            | HostEvent::CharacterMessageRendered { message_id }
            | HostEvent::MessageUpdated { message_id }
            | HostEvent::MessageSwiped { message_id } => {
                self.schedule_render(session, message_id).await.into_iter().collect()
            }
            HostEvent::GenerationEnded | HostEvent::GenerationStopped => {
                match self.active_assistant_message(session).await {
                    Some(id) => self.schedule_render(session, id).await.into_iter().collect(),
                    None => Vec::new(),
                }
            }
            HostEvent::ChatChanged => {
                session.reset();
                self.refresh_all().await
            }
            HostEvent::MoreMessagesLoaded | HostEvent::FirstLoad => self.refresh_all().await,
            HostEvent::CharacterRenamed { old_key, new_key } => {
                self.library.rename_character(&old_key, &new_key).await?;
                Vec::new()
            }
            HostEvent::CharacterDeleted { character_key } => {
                self.library.delete_character(&character_key).await?;
                Vec::new()
            }
        };
        Ok(rendered)
    }
}

/// Assistant messages with real content and no placeholder yet
fn should_auto_inject(message: &ChatMessage) -> bool {
    if message.is_user() || message.is_system() {
        return false;
    }
    let visible = message.text.replace('\u{200b}', "");
    let visible = visible.trim();
    if visible.is_empty() || visible == "..." || visible == "…" {
        return false;
    }
    !contains_placeholder(&message.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::SettingsRepositoryPort;
    use crate::domain::entities::{ImageEntry, MessageRole};
    use crate::domain::value_objects::EmbedSettings;
    use crate::infrastructure::persistence::{InMemoryChatLog, InMemorySettingsRepository};

    struct Fixture {
        chat: Arc<InMemoryChatLog>,
        service: EmbedService,
    }

    async fn fixture(names: &[&str], double_enabled: bool) -> Fixture {
        let repository = Arc::new(InMemorySettingsRepository::new());
        let mut settings = EmbedSettings {
            double_enabled,
            ..Default::default()
        };
        for name in names {
            settings
                .entries_for_mut("alice.png")
                .push(ImageEntry::new(*name, format!("/img/{}.png", name)));
        }
        repository.save(&settings).await.unwrap();

        let chat = Arc::new(InMemoryChatLog::new(Some("alice.png".to_string())));
        let settings = Arc::new(SettingsService::new(repository));
        let library = Arc::new(ExpressionLibraryService::new(settings.clone(), chat.clone()));
        let service = EmbedService::new(
            chat.clone(),
            library,
            settings,
            Arc::new(ScoringLexicon::default()),
            AttributionTuning::default(),
        );
        Fixture { chat, service }
    }

    fn image_names(rendered: &RenderedMessage) -> Vec<String> {
        rendered
            .segments
            .iter()
            .filter_map(|s| match s {
                RenderSegment::Image { entry, .. } => Some(entry.name.clone()),
                RenderSegment::Text(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_pick_entries_for_two_speakers() {
        let f = fixture(&["alice/smile", "bob/frown"], true).await;
        let id = f
            .chat
            .append(MessageRole::Assistant, "Alice: Hi there!\nBob: Hello.")
            .await;

        let placements = f.service.pick_entries_for_message(id, true).await;
        let names: Vec<&str> = placements.iter().map(|p| p.entry.name.as_str()).collect();
        assert_eq!(names, vec!["alice/smile", "bob/frown"]);

        let placements = f.service.pick_entries_for_message(MessageId::new(99), true).await;
        assert!(placements.is_empty());
    }

    #[tokio::test]
    async fn test_render_auto_injects_and_renders() {
        let f = fixture(&["alice/smile", "bob/frown"], true).await;
        let id = f
            .chat
            .append(MessageRole::Assistant, "Alice: Hi there!\nBob: Hello.")
            .await;

        let rendered = f.service.process_message(id).await.unwrap();
        assert_eq!(rendered.injected.len(), 2);
        assert_eq!(
            rendered.text,
            "Alice: Hi there!\n{{img::alice/smile}}\n\nBob: Hello.\n{{img::bob/frown}}\n"
        );
        assert_eq!(image_names(&rendered), vec!["alice/smile", "bob/frown"]);

        // Rendering again starts from the untouched host text
        assert_eq!(f.service.process_message(id).await.unwrap(), rendered);
    }

    #[tokio::test]
    async fn test_explicit_placeholder_suppresses_auto_inject() {
        let f = fixture(&["grin", "smile"], false).await;
        let id = f
            .chat
            .append(MessageRole::Assistant, "She smiled. {{img::grin}} {{img::GRIN}}")
            .await;

        let rendered = f.service.process_message(id).await.unwrap();
        assert!(rendered.injected.is_empty());
        assert_eq!(image_names(&rendered), vec!["grin"]);
    }

    #[tokio::test]
    async fn test_user_and_placeholder_only_messages() {
        let f = fixture(&["grin"], false).await;
        let user = f.chat.append(MessageRole::User, "Show me a {{img::grin}}").await;
        let pending = f.chat.append(MessageRole::Assistant, " …\u{200b} ").await;

        // user placeholders render but nothing is inserted
        let rendered = f.service.process_message(user).await.unwrap();
        assert!(rendered.injected.is_empty());
        assert_eq!(image_names(&rendered), vec!["grin"]);

        let rendered = f.service.process_message(pending).await.unwrap();
        assert!(rendered.injected.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_setting_skips_auto_inject() {
        let f = fixture(&["grin"], false).await;
        f.service.settings.set_enabled(false).await.unwrap();
        let id = f.chat.append(MessageRole::Assistant, "A quiet night.").await;

        let rendered = f.service.process_message(id).await.unwrap();
        assert!(rendered.injected.is_empty());
        assert_eq!(rendered.text, "A quiet night.");
    }

    #[tokio::test]
    async fn test_generation_ended_uses_session_message() {
        let f = fixture(&["grin"], false).await;
        let first = f.chat.append(MessageRole::Assistant, "First reply.").await;
        f.chat.append(MessageRole::User, "And then?").await;

        let mut session = RenderSession::new();
        f.service
            .handle_event(&mut session, HostEvent::CharacterMessageRendered { message_id: first })
            .await
            .unwrap();
        assert_eq!(session.last_assistant_message(), Some(first));

        let rendered = f
            .service
            .handle_event(&mut session, HostEvent::GenerationEnded)
            .await
            .unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].message_id, first);

        // after a chat change the newest message is used
        f.service
            .handle_event(&mut session, HostEvent::ChatChanged)
            .await
            .unwrap();
        assert_eq!(session.last_assistant_message(), None);
        assert_eq!(
            f.service.active_assistant_message(&session).await,
            Some(MessageId::new(1))
        );
    }

    #[tokio::test]
    async fn test_refresh_all_renders_every_message() {
        let f = fixture(&["grin"], false).await;
        f.chat.append(MessageRole::User, "Hi").await;
        f.chat.append(MessageRole::Assistant, "Hello there.").await;

        let mut session = RenderSession::new();
        let rendered = f
            .service
            .handle_event(&mut session, HostEvent::MoreMessagesLoaded)
            .await
            .unwrap();
        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].injected.is_empty());
        assert_eq!(rendered[1].injected.len(), 1);
    }

    #[tokio::test]
    async fn test_character_events_update_library() {
        let f = fixture(&["grin"], false).await;
        let mut session = RenderSession::new();

        f.service
            .handle_event(
                &mut session,
                HostEvent::CharacterRenamed {
                    old_key: "alice.png".to_string(),
                    new_key: "alicia.png".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(f.service.library.active_entries().await.is_empty());
        assert_eq!(f.service.library.entries_for("alicia.png").await.unwrap().len(), 1);

        f.service
            .handle_event(
                &mut session,
                HostEvent::CharacterDeleted {
                    character_key: "alicia.png".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(f.service.library.entries_for("alicia.png").await.unwrap().is_empty());
    }
}
