use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{
    Chat, NewChat, NewProject, NewProjectSettings, Project, ProjectDocument, ProjectSettings, User,
};

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Table operations the handlers need.
///
/// Every method that touches caller-owned rows takes the owner's `clerk_id`
/// as an explicit argument; implementations must apply it as an equality
/// predicate alongside the row id.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by `/health`
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert_user(&self, clerk_id: &str) -> Result<User, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn list_projects(&self, clerk_id: &str) -> Result<Vec<Project>, StoreError>;

    /// Insert a project and its settings row as one unit. Either both rows
    /// exist afterwards or neither does.
    async fn create_project(
        &self,
        project: NewProject,
        settings: NewProjectSettings,
    ) -> Result<Project, StoreError>;

    async fn get_project(&self, clerk_id: &str, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Returns the deleted row, or `None` when nothing matched
    async fn delete_project(&self, clerk_id: &str, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Settings lookup by project id. When `clerk_id` is given the owning
    /// project must also belong to that caller.
    async fn get_project_settings(
        &self,
        project_id: Uuid,
        clerk_id: Option<&str>,
    ) -> Result<Option<ProjectSettings>, StoreError>;

    /// Newest first
    async fn list_project_chats(&self, clerk_id: &str, project_id: Uuid) -> Result<Vec<Chat>, StoreError>;

    /// Newest first
    async fn list_project_documents(
        &self,
        clerk_id: &str,
        project_id: Uuid,
    ) -> Result<Vec<ProjectDocument>, StoreError>;

    async fn insert_chat(&self, chat: NewChat) -> Result<Chat, StoreError>;

    /// Returns the deleted row, or `None` when nothing matched
    async fn delete_chat(&self, clerk_id: &str, id: Uuid) -> Result<Option<Chat>, StoreError>;
}
