use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::ProjectDocument;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;

/// GET /api/projects/:project_id/files
///
/// A new project has no documents, so an empty list is a normal answer.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<String>,
) -> ApiResult<Vec<ProjectDocument>> {
    let id = parse_id("project", &project_id)?;

    let documents = state
        .store
        .list_project_documents(&caller.clerk_id, id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch project files", e))?;

    Ok(ApiResponse::success("Project files fetched successfully", documents))
}
