//! Settings Service - cached access to the embed settings blob
//!
//! Field changes go through [`SettingsService::modify`], so a partial update
//! never replaces the per-character entry lists.

use std::sync::Arc;
use tokio::sync::RwLock;
use crate::application::ports::outbound::{SettingsRepositoryPort, SettingsError};
use crate::domain::value_objects::EmbedSettings;

pub struct SettingsService {
    repository: Arc<dyn SettingsRepositoryPort>,
    cache: RwLock<Option<EmbedSettings>>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepositoryPort>) -> Self {
        Self {
            repository,
            cache: RwLock::new(None),
        }
    }

    /// Get current settings (cached)
    pub async fn get(&self) -> EmbedSettings {
        let cache = self.cache.read().await;
        if let Some(settings) = &*cache {
            return settings.clone();
        }
        drop(cache);

        // Load from DB
        match self.repository.get().await {
            Ok(settings) => {
                *self.cache.write().await = Some(settings.clone());
                settings
            }
            Err(e) => {
                tracing::warn!("Falling back to default embed settings: {}", e);
                EmbedSettings::default()
            }
        }
    }


    /// Apply `change` to the current settings and persist the result.
    ///
    /// The write lock is held across load, change and save so concurrent
    /// modifications do not overwrite each other.
    pub async fn modify<R>(
        &self,
        change: impl FnOnce(&mut EmbedSettings) -> R,
    ) -> Result<R, SettingsError> {
        let mut cache = self.cache.write().await;
        let mut settings = match &*cache {
            Some(settings) => settings.clone(),
            None => self.repository.get().await?,
        };

        let result = change(&mut settings);
        self.repository.save(&settings).await?;
        *cache = Some(settings);
        Ok(result)
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<(), SettingsError> {
        self.modify(|s| s.enabled = enabled).await
    }

    pub async fn set_double_enabled(&self, double_enabled: bool) -> Result<(), SettingsError> {
        self.modify(|s| s.double_enabled = double_enabled).await
    }

    /// Change only the toggles that are given; entries stay untouched
    pub async fn update_toggles(
        &self,
        enabled: Option<bool>,
        double_enabled: Option<bool>,
    ) -> Result<EmbedSettings, SettingsError> {
        self.modify(|s| {
            if let Some(enabled) = enabled {
                s.enabled = enabled;
            }
            if let Some(double_enabled) = double_enabled {
                s.double_enabled = double_enabled;
            }
            s.clone()
        })
        .await
    }

    /// Reset to defaults and clear DB values
    pub async fn reset(&self) -> Result<EmbedSettings, SettingsError> {
        let settings = self.repository.reset().await?;
        *self.cache.write().await = Some(settings.clone());
        Ok(settings)
    }
}
