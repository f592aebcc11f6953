// /api/projects handlers
//
// Collections come back as `[]` when nothing matches; single-row lookups
// are 404 when nothing matches.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Chat, Project, ProjectSettings};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::services::ProjectService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Vec<Project>> {
    let projects = state
        .store
        .list_projects(&caller.clerk_id)
        .await
        .map_err(|e| ApiError::storage("Failed to get projects", e))?;

    Ok(ApiResponse::success("Projects fetched successfully", projects))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<Project> {
    let Json(body) = payload?;
    let name = body.name.as_deref().ok_or_else(|| ApiError::missing_field("name"))?;

    let project = ProjectService::new(state.store.clone())
        .create_project(&caller.clerk_id, name, body.description.as_deref())
        .await?;

    Ok(ApiResponse::success("Project created successfully", project))
}

/// GET /api/projects/:project_id
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<String>,
) -> ApiResult<Project> {
    let id = parse_id("project", &project_id)?;

    let project = state
        .store
        .get_project(&caller.clerk_id, id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch project", e))?
        .ok_or_else(|| ApiError::not_found("Project not found / Access denied"))?;

    Ok(ApiResponse::success("Project fetched successfully", project))
}

/// DELETE /api/projects/:project_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<String>,
) -> ApiResult<Project> {
    let id = parse_id("project", &project_id)?;

    let deleted = ProjectService::new(state.store.clone())
        .delete_project(&caller.clerk_id, id)
        .await?;

    Ok(ApiResponse::success("Project deleted successfully", deleted))
}

/// GET /api/projects/:project_id/chats
pub async fn chats(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<String>,
) -> ApiResult<Vec<Chat>> {
    let id = parse_id("project", &project_id)?;

    let chats = state
        .store
        .list_project_chats(&caller.clerk_id, id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch project chats", e))?;

    Ok(ApiResponse::success("Project chats fetched successfully", chats))
}

/// GET /api/projects/:project_id/settings
///
/// Scoped by project id only unless the owner check is enabled in config.
pub async fn settings(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<String>,
) -> ApiResult<ProjectSettings> {
    let id = parse_id("project", &project_id)?;
    let owner = state
        .settings_owner_check
        .then_some(caller.clerk_id.as_str());

    let settings = state
        .store
        .get_project_settings(id, owner)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch project settings", e))?
        .ok_or_else(|| ApiError::not_found("Project settings not found / Access denied"))?;

    Ok(ApiResponse::success("Project settings fetched successfully", settings))
}
