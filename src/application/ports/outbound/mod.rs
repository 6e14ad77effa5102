//! Outbound ports - Interfaces that the application requires from external systems

mod chat_port;
mod settings_port;

pub use chat_port::ChatLogPort;
pub use settings_port::{SettingsError, SettingsRepositoryPort};
