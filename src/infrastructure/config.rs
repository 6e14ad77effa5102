//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::value_objects::AttributionTuning;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL for the settings store
    pub database_url: String,

    /// HTTP server port
    pub server_port: u16,

    /// Optional JSON file replacing the built-in scoring lexicon
    pub lexicon_path: Option<PathBuf>,

    /// Attribution heuristic constants
    pub tuning: AttributionTuning,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("EMBEDS_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://embeds.db?mode=rwc".to_string()),

            server_port: env::var("EMBEDS_SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("EMBEDS_SERVER_PORT must be a valid port number")?,

            lexicon_path: env::var("EMBEDS_LEXICON_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            tuning: AttributionTuning::from_env(),
        })
    }
}
