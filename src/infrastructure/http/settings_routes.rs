use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use super::internal_error;
use crate::application::dto::UpdateSettingsRequestDto;
use crate::domain::value_objects::EmbedSettings;
use crate::infrastructure::state::AppState;

pub fn settings_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/settings", get(get_settings).put(update_settings))
        .route("/api/settings/reset", post(reset_settings))
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<EmbedSettings> {
    Json(state.settings_service.get().await)
}

/// Write the toggles; entry lists are only changed through the expression routes
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateSettingsRequestDto>,
) -> Result<Json<EmbedSettings>, (StatusCode, String)> {
    state
        .settings_service
        .update_toggles(req.enabled, req.double_enabled)
        .await
        .map(Json)
        .map_err(internal_error)
}

async fn reset_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EmbedSettings>, (StatusCode, String)> {
    state
        .settings_service
        .reset()
        .await
        .map(Json)
        .map_err(internal_error)
}
