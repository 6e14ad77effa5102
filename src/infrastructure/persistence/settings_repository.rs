use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{SettingsError, SettingsRepositoryPort};
use crate::domain::value_objects::EmbedSettings;

pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Create table if not exists
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS embed_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, SettingsError> {
    serde_json::to_string(value).map_err(|e| SettingsError::Serialization(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T, SettingsError> {
    serde_json::from_str(value)
        .map_err(|e| SettingsError::Serialization(format!("{}: {}", key, e)))
}

#[async_trait]
impl SettingsRepositoryPort for SqliteSettingsRepository {
    async fn get(&self) -> Result<EmbedSettings, SettingsError> {
        let mut settings = EmbedSettings::default();

        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM embed_settings")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SettingsError::Database(e.to_string()))?;

        for (key, value) in rows {
            match key.as_str() {
                "enabled" => if let Ok(v) = value.parse() { settings.enabled = v; },
                "double_enabled" => if let Ok(v) = value.parse() { settings.double_enabled = v; },
                "characters" => settings.characters = from_json(&key, &value)?,
                "legacy_entries" => settings.entries = from_json(&key, &value)?,
                _ => {}
            }
        }

        Ok(settings)
    }

    async fn save(&self, settings: &EmbedSettings) -> Result<(), SettingsError> {
        let pairs = [
            ("enabled", settings.enabled.to_string()),
            ("double_enabled", settings.double_enabled.to_string()),
            ("characters", to_json(&settings.characters)?),
            ("legacy_entries", to_json(&settings.entries)?),
        ];

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SettingsError::Database(e.to_string()))?;

        for (key, value) in pairs {
            sqlx::query("INSERT OR REPLACE INTO embed_settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)")
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(|e| SettingsError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| SettingsError::Database(e.to_string()))?;

        Ok(())
    }

    async fn reset(&self) -> Result<EmbedSettings, SettingsError> {
        sqlx::query("DELETE FROM embed_settings")
            .execute(&self.pool)
            .await
            .map_err(|e| SettingsError::Database(e.to_string()))?;

        Ok(EmbedSettings::default())
    }
}
