use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Chat, NewChat};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// POST /api/chats
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<CreateChatRequest>, JsonRejection>,
) -> ApiResult<Chat> {
    let Json(body) = payload?;

    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::missing_field("title"))?;
    let project_id = body
        .project_id
        .as_deref()
        .ok_or_else(|| ApiError::missing_field("project_id"))?;
    let project_id = parse_id("project", project_id)?;

    let chat = state
        .store
        .insert_chat(NewChat {
            project_id,
            clerk_id: caller.clerk_id,
            title: title.to_string(),
        })
        .await
        .map_err(|e| ApiError::storage("Failed to create chat", e))?;

    Ok(ApiResponse::success("Chat created successfully", chat))
}

/// DELETE /api/chats/:chat_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(chat_id): Path<String>,
) -> ApiResult<Chat> {
    let id = parse_id("chat", &chat_id)?;

    let deleted = state
        .store
        .delete_chat(&caller.clerk_id, id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete chat", e))?
        .ok_or_else(|| ApiError::not_found("Chat not found / Access denied"))?;

    tracing::info!("Chat {} deleted by {}", deleted.id, deleted.clerk_id);
    Ok(ApiResponse::success("Chat deleted successfully", deleted))
}
