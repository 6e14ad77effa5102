//! Domain layer - Core business logic with no I/O
//!
//! This layer contains:
//! - Entities: ImageEntry, ChatMessage
//! - Value Objects: ids, entry names, placeholders, lexicon, settings, tuning
//! - Domain Events: notifications from the chat host
//! - Domain Services: character scoring, dominance analysis, entry selection,
//!   placement planning and placeholder rendering

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;
