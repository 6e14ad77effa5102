use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;

use super::internal_error;
use crate::application::dto::RenderedMessageDto;
use crate::domain::events::HostEvent;
use crate::infrastructure::state::AppState;

pub fn event_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/events", post(dispatch_event))
}

/// Feed one host notification through the render session
async fn dispatch_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<HostEvent>,
) -> Result<Json<Vec<RenderedMessageDto>>, (StatusCode, String)> {
    tracing::debug!(?event, "Host event received");

    let mut session = state.session.write().await;
    let rendered = state
        .embed_service
        .handle_event(&mut session, event)
        .await
        .map_err(internal_error)?;
    Ok(Json(rendered.into_iter().map(Into::into).collect()))
}
