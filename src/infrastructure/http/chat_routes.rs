use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

use super::internal_error;
use crate::application::dto::{
    AppendMessageRequestDto, MessageResponseDto, PlacementDto, PlacementQueryDto,
    RenderedMessageDto, SetCharacterRequestDto, UpdateMessageRequestDto,
};
use crate::application::ports::outbound::ChatLogPort;
use crate::domain::events::HostEvent;
use crate::domain::value_objects::MessageId;
use crate::infrastructure::state::AppState;

pub fn chat_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chat/character", put(set_character))
        .route("/api/chat/messages", get(list_messages).post(append_message))
        .route("/api/chat/messages/{id}", put(update_message))
        .route("/api/chat/messages/{id}/placements", get(get_placements))
        .route("/api/chat/messages/{id}/render", post(render_message))
}

/// Open another chat; behaves like the host's chat-changed signal
async fn set_character(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetCharacterRequestDto>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.chat.open_chat(req.character).await;

    let mut session = state.session.write().await;
    state
        .embed_service
        .handle_event(&mut session, HostEvent::ChatChanged)
        .await
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_messages(State(state): State<Arc<AppState>>) -> Json<Vec<MessageResponseDto>> {
    let mut messages = Vec::new();
    for id in state.chat.message_ids().await {
        if let Some(message) = state.chat.get_message(id).await {
            messages.push(MessageResponseDto::from(message));
        }
    }
    Json(messages)
}

/// Append a message and render it as the host would after drawing it
async fn append_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AppendMessageRequestDto>,
) -> Result<(StatusCode, Json<RenderedMessageDto>), (StatusCode, String)> {
    let id = state.chat.append(req.role, req.text).await;

    let mut session = state.session.write().await;
    let rendered = state
        .embed_service
        .schedule_render(&mut session, id)
        .await
        .ok_or_else(|| internal_error(format!("Message {} vanished", id)))?;
    Ok((StatusCode::CREATED, Json(rendered.into())))
}

async fn update_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<usize>,
    Json(req): Json<UpdateMessageRequestDto>,
) -> Result<Json<Vec<RenderedMessageDto>>, (StatusCode, String)> {
    let message_id = MessageId::new(id);
    state
        .chat
        .update(message_id, req.text)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Message not found: {}", id)))?;

    let mut session = state.session.write().await;
    let rendered = state
        .embed_service
        .handle_event(&mut session, HostEvent::MessageUpdated { message_id })
        .await
        .map_err(internal_error)?;
    Ok(Json(rendered.into_iter().map(Into::into).collect()))
}

async fn get_placements(
    State(state): State<Arc<AppState>>,
    Path(id): Path<usize>,
    Query(query): Query<PlacementQueryDto>,
) -> Json<Vec<PlacementDto>> {
    let allow_multiple = match query.multiple {
        Some(multiple) => multiple,
        None => state.settings_service.get().await.double_enabled,
    };
    let placements = state
        .embed_service
        .pick_entries_for_message(MessageId::new(id), allow_multiple)
        .await;
    Json(placements.into_iter().map(Into::into).collect())
}

async fn render_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<usize>,
) -> Result<Json<RenderedMessageDto>, (StatusCode, String)> {
    let mut session = state.session.write().await;
    state
        .embed_service
        .schedule_render(&mut session, MessageId::new(id))
        .await
        .map(|rendered| Json(rendered.into()))
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Message not found: {}", id)))
}
