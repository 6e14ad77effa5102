//! Shared application state

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::RwLock;

use crate::application::ports::outbound::SettingsRepositoryPort;
use crate::application::services::{
    EmbedService, ExpressionLibraryService, RenderSession, SettingsService,
};
use crate::domain::value_objects::ScoringLexicon;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::{InMemoryChatLog, SqliteSettingsRepository};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Mirror of the host transcript for the open chat
    pub chat: Arc<InMemoryChatLog>,
    /// Render scheduling state of the open chat
    pub session: RwLock<RenderSession>,
    // Application services
    pub settings_service: Arc<SettingsService>,
    pub library_service: Arc<ExpressionLibraryService>,
    pub embed_service: EmbedService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        // Initialize SQLite settings store
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .with_context(|| format!("Failed to open settings database {}", config.database_url))?;
        let settings_repository = SqliteSettingsRepository::new(pool)
            .await
            .context("Failed to prepare settings table")?;

        let lexicon = match &config.lexicon_path {
            Some(path) => load_lexicon(path)?,
            None => ScoringLexicon::default(),
        };

        Ok(Self::with_adapters(
            config,
            Arc::new(settings_repository),
            Arc::new(InMemoryChatLog::new(None)),
            lexicon,
        ))
    }

    /// Wire services over the given adapters
    pub fn with_adapters(
        config: AppConfig,
        settings_repository: Arc<dyn SettingsRepositoryPort>,
        chat: Arc<InMemoryChatLog>,
        lexicon: ScoringLexicon,
    ) -> Self {
        let settings_service = Arc::new(SettingsService::new(settings_repository));
        let library_service = Arc::new(ExpressionLibraryService::new(
            settings_service.clone(),
            chat.clone(),
        ));
        let embed_service = EmbedService::new(
            chat.clone(),
            library_service.clone(),
            settings_service.clone(),
            Arc::new(lexicon),
            config.tuning.clone(),
        );

        Self {
            config,
            chat,
            session: RwLock::new(RenderSession::new()),
            settings_service,
            library_service,
            embed_service,
        }
    }
}

fn load_lexicon(path: &Path) -> Result<ScoringLexicon> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
    let lexicon = ScoringLexicon::from_json(&json)
        .with_context(|| format!("Invalid lexicon file {}", path.display()))?;
    tracing::info!("Loaded {} lexicon phrases from {}", lexicon.entries().len(), path.display());
    Ok(lexicon)
}
