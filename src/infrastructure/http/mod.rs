//! HTTP REST API routes

mod chat_routes;
mod event_routes;
mod expression_routes;
mod settings_routes;

use axum::{http::StatusCode, Router};
use std::sync::Arc;

use crate::application::services::LibraryError;
use crate::infrastructure::state::AppState;

pub use chat_routes::chat_routes;
pub use event_routes::event_routes;
pub use expression_routes::expression_routes;
pub use settings_routes::settings_routes;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(settings_routes())
        .merge(chat_routes())
        .merge(expression_routes())
        .merge(event_routes())
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn library_error(e: LibraryError) -> (StatusCode, String) {
    let status = match &e {
        LibraryError::NoActiveCharacter => StatusCode::CONFLICT,
        LibraryError::NotAnImage(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        LibraryError::MissingUrl => StatusCode::BAD_REQUEST,
        LibraryError::EntryNotFound(_) => StatusCode::NOT_FOUND,
        LibraryError::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
