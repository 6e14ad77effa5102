//! Expression Library Service - per-character image entry management
//!
//! Entries are stored in the host settings blob under the key (avatar) of the
//! character whose chat is open. Names stay unique per character after
//! normalization.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::ports::outbound::{ChatLogPort, SettingsError};
use crate::application::services::settings_service::SettingsService;
use crate::domain::entities::ImageEntry;
use crate::domain::services::find_entry_by_name;
use crate::domain::value_objects::{normalize_name, EntryId};

const DEFAULT_ENTRY_NAME: &str = "expression";

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Open a character chat to manage expressions")]
    NoActiveCharacter,
    #[error("File must be an image, got content type {0:?}")]
    NotAnImage(String),
    #[error("Image url cannot be empty")]
    MissingUrl,
    #[error("Expression not found: {0}")]
    EntryNotFound(EntryId),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// An uploaded image the host has already stored
#[derive(Debug, Clone)]
pub struct AddEntryRequest {
    /// Original file name of the upload
    pub file_name: String,
    pub content_type: String,
    /// Where the host asset store put the file
    pub url: String,
}

pub struct ExpressionLibraryService {
    settings: Arc<SettingsService>,
    chat: Arc<dyn ChatLogPort>,
}

impl ExpressionLibraryService {
    pub fn new(settings: Arc<SettingsService>, chat: Arc<dyn ChatLogPort>) -> Self {
        Self { settings, chat }
    }

    async fn require_character(&self) -> Result<String, LibraryError> {
        self.chat
            .active_character()
            .await
            .ok_or(LibraryError::NoActiveCharacter)
    }

    /// Entries of a character in registration order.
    ///
    /// Moves the legacy global list onto this character first when it has
    /// none of its own.
    pub async fn entries_for(&self, character_key: &str) -> Result<Vec<ImageEntry>, SettingsError> {
        let settings = self.settings.get().await;
        let needs_migration = settings.entries.as_ref().is_some_and(|e| !e.is_empty())
            && settings.entries_for(character_key).is_empty();

        if needs_migration {
            info!(character = %character_key, "Migrating legacy expression entries");
            return self
                .settings
                .modify(|s| {
                    s.migrate_legacy_entries(character_key);
                    s.entries_for(character_key).to_vec()
                })
                .await;
        }

        Ok(settings.entries_for(character_key).to_vec())
    }

    /// Entries of the open character; empty when there is none or settings
    /// cannot be read.
    pub async fn active_entries(&self) -> Vec<ImageEntry> {
        let Some(character_key) = self.chat.active_character().await else {
            return Vec::new();
        };
        match self.entries_for(&character_key).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(character = %character_key, "Could not load expression entries: {}", e);
                Vec::new()
            }
        }
    }

    /// Register an uploaded image under a unique name derived from its file name
    #[instrument(skip(self), fields(file_name = %request.file_name))]
    pub async fn add_entry(&self, request: AddEntryRequest) -> Result<ImageEntry, LibraryError> {
        let character_key = self.require_character().await?;

        if !request.content_type.starts_with("image/") {
            return Err(LibraryError::NotAnImage(request.content_type));
        }
        if request.url.trim().is_empty() {
            return Err(LibraryError::MissingUrl);
        }

        // Make sure a legacy list lands before uniqueness is checked
        self.entries_for(&character_key).await?;

        let entry = self
            .settings
            .modify(|s| {
                let entries = s.entries_for_mut(&character_key);
                let name = ensure_unique_name(entries, file_stem(&request.file_name));
                let entry = ImageEntry::new(name, request.url.clone())
                    .with_original_name(request.file_name.clone());
                entries.push(entry.clone());
                entry
            })
            .await?;

        info!(character = %character_key, name = %entry.name, "Image expression added");
        Ok(entry)
    }

    /// Inline edit of an entry name
    #[instrument(skip(self))]
    pub async fn rename_entry(&self, id: EntryId, name: String) -> Result<ImageEntry, LibraryError> {
        let character_key = self.require_character().await?;

        let renamed = self
            .settings
            .modify(|s| {
                s.entries_for_mut(&character_key)
                    .iter_mut()
                    .find(|e| e.id == id)
                    .map(|e| {
                        e.rename(name);
                        e.clone()
                    })
            })
            .await?;

        renamed.ok_or(LibraryError::EntryNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn remove_entry(&self, id: EntryId) -> Result<(), LibraryError> {
        let character_key = self.require_character().await?;

        let removed = self
            .settings
            .modify(|s| {
                let entries = s.entries_for_mut(&character_key);
                let before = entries.len();
                entries.retain(|e| e.id != id);
                entries.len() != before
            })
            .await?;

        if !removed {
            return Err(LibraryError::EntryNotFound(id));
        }
        info!(character = %character_key, entry = %id, "Image expression removed");
        Ok(())
    }

    /// Look an entry of the open character up by normalized name
    pub async fn find_entry_by_name(&self, name: &str) -> Option<ImageEntry> {
        let entries = self.active_entries().await;
        find_entry_by_name(&entries, name).cloned()
    }

    /// Move entries after the host renamed a character's avatar
    pub async fn rename_character(&self, old_key: &str, new_key: &str) -> Result<bool, SettingsError> {
        if !self.settings.get().await.characters.contains_key(old_key) {
            return Ok(false);
        }
        let moved = self
            .settings
            .modify(|s| s.rename_character(old_key, new_key))
            .await?;
        if moved {
            info!(old = %old_key, new = %new_key, "Moved expressions to renamed character");
        }
        Ok(moved)
    }

    /// Drop entries of a deleted character
    pub async fn delete_character(&self, character_key: &str) -> Result<bool, SettingsError> {
        if !self.settings.get().await.characters.contains_key(character_key) {
            return Ok(false);
        }
        let removed = self
            .settings
            .modify(|s| s.remove_character(character_key))
            .await?;
        if removed {
            info!(character = %character_key, "Dropped expressions of deleted character");
        }
        Ok(removed)
    }
}

/// File name without its last extension
fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}

/// Normalized `base`, suffixed `_1`, `_2`, ... until no entry shares it
pub fn ensure_unique_name(entries: &[ImageEntry], base: &str) -> String {
    let normalized = normalize_name(base);
    let base = if normalized.is_empty() {
        DEFAULT_ENTRY_NAME.to_string()
    } else {
        normalized
    };

    let taken = |candidate: &str| entries.iter().any(|e| e.normalized_name() == candidate);

    let mut candidate = base.clone();
    let mut counter = 1;
    while taken(&candidate) {
        candidate = format!("{}_{}", base, counter);
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::SettingsRepositoryPort;
    use crate::domain::value_objects::EmbedSettings;
    use crate::infrastructure::persistence::{InMemoryChatLog, InMemorySettingsRepository};

    fn service(
        repository: Arc<InMemorySettingsRepository>,
        character: Option<&str>,
    ) -> ExpressionLibraryService {
        let chat = Arc::new(InMemoryChatLog::new(character.map(|c| c.to_string())));
        ExpressionLibraryService::new(Arc::new(SettingsService::new(repository)), chat)
    }

    fn upload(file_name: &str) -> AddEntryRequest {
        AddEntryRequest {
            file_name: file_name.to_string(),
            content_type: "image/png".to_string(),
            url: format!("/user/images/{}", file_name),
        }
    }

    #[test]
    fn test_ensure_unique_name() {
        let entries = vec![
            ImageEntry::new("smile", "/a.png"),
            ImageEntry::new("Smile_1", "/b.png"),
        ];
        assert_eq!(ensure_unique_name(&entries, "Smile"), "smile_2");
        assert_eq!(ensure_unique_name(&entries, "Big Grin"), "big_grin");
        assert_eq!(ensure_unique_name(&entries, "  "), "expression");
        assert_eq!(ensure_unique_name(&[], ""), "expression");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("smile.png"), "smile");
        assert_eq!(file_stem("alice.smile.webp"), "alice.smile");
        assert_eq!(file_stem(".hidden"), ".hidden");
        assert_eq!(file_stem("noext"), "noext");
    }

    #[tokio::test]
    async fn test_add_then_find_by_normalized_name() {
        let service = service(Arc::new(InMemorySettingsRepository::new()), Some("alice.png"));

        let first = service.add_entry(upload("Alice Smile.png")).await.unwrap();
        let second = service.add_entry(upload("alice smile.jpg")).await.unwrap();
        assert_eq!(first.name, "alice_smile");
        assert_eq!(second.name, "alice_smile_1");
        assert_eq!(first.original_name, "Alice Smile.png");

        let found = service.find_entry_by_name(&first.normalized_name()).await.unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_uploads() {
        let service = service(Arc::new(InMemorySettingsRepository::new()), Some("alice.png"));

        let mut request = upload("notes.txt");
        request.content_type = "text/plain".to_string();
        assert!(matches!(service.add_entry(request).await, Err(LibraryError::NotAnImage(_))));

        let mut request = upload("smile.png");
        request.url = " ".to_string();
        assert!(matches!(service.add_entry(request).await, Err(LibraryError::MissingUrl)));

        let service = service_without_character();
        assert!(matches!(
            service.add_entry(upload("smile.png")).await,
            Err(LibraryError::NoActiveCharacter)
        ));
        assert!(service.active_entries().await.is_empty());
    }

    fn service_without_character() -> ExpressionLibraryService {
        service(Arc::new(InMemorySettingsRepository::new()), None)
    }

    #[tokio::test]
    async fn test_rename_and_remove_entry() {
        let service = service(Arc::new(InMemorySettingsRepository::new()), Some("alice.png"));
        let entry = service.add_entry(upload("smile.png")).await.unwrap();

        let renamed = service.rename_entry(entry.id, "alice/smile".to_string()).await.unwrap();
        assert_eq!(renamed.name, "alice/smile");
        assert_eq!(service.active_entries().await[0].name, "alice/smile");

        service.remove_entry(entry.id).await.unwrap();
        assert!(service.active_entries().await.is_empty());
        assert!(matches!(
            service.remove_entry(entry.id).await,
            Err(LibraryError::EntryNotFound(_))
        ));
        assert!(matches!(
            service.rename_entry(entry.id, "x".to_string()).await,
            Err(LibraryError::EntryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_legacy_entries_migrate_to_open_character() {
        let repository = Arc::new(InMemorySettingsRepository::new());
        repository
            .save(&EmbedSettings {
                entries: Some(vec![ImageEntry::new("grin", "/grin.png")]),
                ..Default::default()
            })
            .await
            .unwrap();

        let service = service(repository.clone(), Some("alice.png"));
        let entries = service.active_entries().await;
        assert_eq!(entries.len(), 1);

        let stored = repository.get().await.unwrap();
        assert!(stored.entries.is_none());
        assert_eq!(stored.entries_for("alice.png").len(), 1);
    }

    #[tokio::test]
    async fn test_character_rename_and_delete() {
        let repository = Arc::new(InMemorySettingsRepository::new());
        let service = service(repository.clone(), Some("old.png"));
        service.add_entry(upload("smile.png")).await.unwrap();

        assert!(service.rename_character("old.png", "new.png").await.unwrap());
        assert!(!service.rename_character("old.png", "new.png").await.unwrap());
        assert_eq!(repository.get().await.unwrap().entries_for("new.png").len(), 1);

        assert!(service.delete_character("new.png").await.unwrap());
        assert!(!service.delete_character("new.png").await.unwrap());
        assert!(repository.get().await.unwrap().characters.is_empty());
    }
}
