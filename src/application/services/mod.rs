//! Application services - Use case implementations
//!
//! Each service accepts its port dependencies as trait objects and returns
//! domain values; the HTTP layer maps them to DTOs.

pub mod embed_service;
pub mod expression_library_service;
pub mod render_session;
pub mod settings_service;

pub use embed_service::{EmbedService, RenderedMessage};
pub use expression_library_service::{
    ensure_unique_name, AddEntryRequest, ExpressionLibraryService, LibraryError,
};
pub use render_session::RenderSession;
pub use settings_service::SettingsService;
