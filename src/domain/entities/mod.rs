//! Domain entities - Core business objects with identity

mod image_entry;
mod message;

pub use image_entry::ImageEntry;
pub use message::{ChatMessage, MessageRole};
