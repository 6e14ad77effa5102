//! Persistence adapters
//!
//! SQLite backs the settings blob; the in-memory adapters mirror the host
//! transcript and stand in for storage in tests.

mod memory;
mod settings_repository;

pub use memory::{InMemoryChatLog, InMemorySettingsRepository};
pub use settings_repository::SqliteSettingsRepository;
