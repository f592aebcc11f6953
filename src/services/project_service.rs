use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::models::{NewProject, NewProjectSettings, Project};
use crate::database::{Store, StoreError};
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    #[error("Project not found / Access denied")]
    NotFound,
    #[error("Project creation failed: {0}")]
    CreateFailed(#[source] StoreError),
    #[error("Failed to delete project: {0}")]
    DeleteFailed(#[source] StoreError),
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::MissingField(field) => ApiError::missing_field(field),
            ProjectError::NotFound => ApiError::not_found(err.to_string()),
            ProjectError::CreateFailed(_) | ProjectError::DeleteFailed(_) => {
                tracing::error!("{}", err);
                ApiError::internal_server_error(err.to_string())
            }
        }
    }
}

/// Multi-step project operations
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a project owned by `clerk_id` together with its default
    /// retrieval settings. Returns the project row only.
    pub async fn create_project(
        &self,
        clerk_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, ProjectError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProjectError::MissingField("name"));
        }

        let new_project = NewProject {
            clerk_id: clerk_id.to_string(),
            name: name.to_string(),
            description: description.unwrap_or_default().to_string(),
        };

        let project = self
            .store
            .create_project(new_project, NewProjectSettings::default())
            .await
            .map_err(ProjectError::CreateFailed)?;

        info!("Project {} created for {}", project.id, clerk_id);
        Ok(project)
    }

    /// Check existence and ownership first, then delete
    pub async fn delete_project(&self, clerk_id: &str, id: Uuid) -> Result<Project, ProjectError> {
        let existing = self
            .store
            .get_project(clerk_id, id)
            .await
            .map_err(ProjectError::DeleteFailed)?;
        if existing.is_none() {
            return Err(ProjectError::NotFound);
        }

        let deleted = self
            .store
            .delete_project(clerk_id, id)
            .await
            .map_err(ProjectError::DeleteFailed)?
            .ok_or(ProjectError::NotFound)?;

        info!("Project {} deleted by {}", deleted.id, clerk_id);
        Ok(deleted)
    }
}
