use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{internal_error, library_error};
use crate::application::dto::{
    AddExpressionRequestDto, ExpressionResponseDto, RenameCharacterRequestDto,
    RenameExpressionRequestDto,
};
use crate::domain::events::HostEvent;
use crate::domain::value_objects::EntryId;
use crate::infrastructure::state::AppState;

pub fn expression_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/expressions", get(list_expressions).post(add_expression))
        .route("/api/expressions/{id}", put(rename_expression))
        .route("/api/expressions/{id}", delete(remove_expression))
        .route("/api/characters/rename", post(rename_character))
        .route("/api/characters/{key}", delete(delete_character))
}

/// Entries of the open character
async fn list_expressions(State(state): State<Arc<AppState>>) -> Json<Vec<ExpressionResponseDto>> {
    let entries = state.library_service.active_entries().await;
    Json(entries.iter().map(ExpressionResponseDto::from).collect())
}

async fn add_expression(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddExpressionRequestDto>,
) -> Result<(StatusCode, Json<ExpressionResponseDto>), (StatusCode, String)> {
    let entry = state
        .library_service
        .add_entry(req.into())
        .await
        .map_err(library_error)?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

async fn rename_expression(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameExpressionRequestDto>,
) -> Result<Json<ExpressionResponseDto>, (StatusCode, String)> {
    let entry = state
        .library_service
        .rename_entry(EntryId::from_uuid(id), req.name)
        .await
        .map_err(library_error)?;
    Ok(Json(entry.into()))
}

async fn remove_expression(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .library_service
        .remove_entry(EntryId::from_uuid(id))
        .await
        .map_err(library_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn rename_character(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenameCharacterRequestDto>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut session = state.session.write().await;
    state
        .embed_service
        .handle_event(
            &mut session,
            HostEvent::CharacterRenamed {
                old_key: req.old_key,
                new_key: req.new_key,
            },
        )
        .await
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_character(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut session = state.session.write().await;
    state
        .embed_service
        .handle_event(&mut session, HostEvent::CharacterDeleted { character_key: key })
        .await
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{app, send, test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    fn upload(file_name: &str, content_type: &str) -> serde_json::Value {
        json!({
            "fileName": file_name,
            "contentType": content_type,
            "url": format!("/user/images/{}", file_name),
        })
    }

    #[tokio::test]
    async fn test_expression_lifecycle() {
        let app = app(test_state(Some("alice.png")));

        let (status, created) =
            send(&app, "POST", "/api/expressions", Some(upload("Alice Smile.png", "image/png"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], json!("alice_smile"));
        assert_eq!(created["character"], json!("alice"));
        assert_eq!(created["expression"], json!("smile"));
        assert_eq!(created["originalName"], json!("Alice Smile.png"));
        let id = created["id"].as_str().unwrap().to_string();

        let (status, renamed) = send(
            &app,
            "PUT",
            &format!("/api/expressions/{}", id),
            Some(json!({"name": "alice/grin"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["expression"], json!("grin"));

        let (_, list) = send(&app, "GET", "/api/expressions", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let uri = format!("/api/expressions/{}", id);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_errors_map_to_status_codes() {
        let app = app(test_state(Some("alice.png")));
        let (status, _) =
            send(&app, "POST", "/api/expressions", Some(upload("notes.txt", "text/plain"))).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let app = super::super::test_support::app(test_state(None));
        let (status, body) =
            send(&app, "POST", "/api/expressions", Some(upload("smile.png", "image/png"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!("Open a character chat to manage expressions"));
    }

    #[tokio::test]
    async fn test_character_rename_and_delete_routes() {
        let state = test_state(Some("alice.png"));
        let app = app(state.clone());
        send(&app, "POST", "/api/expressions", Some(upload("smile.png", "image/png"))).await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/characters/rename",
            Some(json!({"oldKey": "alice.png", "newKey": "alicia.png"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let settings = state.settings_service.get().await;
        assert_eq!(settings.entries_for("alicia.png").len(), 1);
        assert!(settings.entries_for("alice.png").is_empty());

        let (status, _) = send(&app, "DELETE", "/api/characters/alicia.png", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.settings_service.get().await.characters.is_empty());
    }
}
