use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::models::{
    Chat, NewChat, NewProject, NewProjectSettings, Project, ProjectDocument, ProjectSettings, User,
};
use crate::database::store::{Store, StoreError};

const PROJECT_COLUMNS: &str = "id, clerk_id, name, description, created_at";
const CHAT_COLUMNS: &str = "id, project_id, clerk_id, title, created_at";
const DOCUMENT_COLUMNS: &str =
    "id, project_id, clerk_id, filename, s3_key, file_size, file_type, processing_status, created_at";

/// Postgres-backed store. All filters are bind parameters.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, clerk_id: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (clerk_id) VALUES ($1) RETURNING id, clerk_id, created_at",
        )
        .bind(clerk_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT id, clerk_id, created_at FROM users")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn list_projects(&self, clerk_id: &str) -> Result<Vec<Project>, StoreError> {
        let query = format!("SELECT {} FROM projects WHERE clerk_id = $1", PROJECT_COLUMNS);
        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(clerk_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    async fn create_project(
        &self,
        project: NewProject,
        settings: NewProjectSettings,
    ) -> Result<Project, StoreError> {
        let mut tx = self.pool.begin().await?;

        let insert_project = format!(
            "INSERT INTO projects (clerk_id, name, description) VALUES ($1, $2, $3) RETURNING {}",
            PROJECT_COLUMNS
        );
        let created = sqlx::query_as::<_, Project>(&insert_project)
            .bind(&project.clerk_id)
            .bind(&project.name)
            .bind(&project.description)
            .fetch_one(&mut *tx)
            .await?;

        let settings_result = sqlx::query(
            r#"
            INSERT INTO project_settings (
                project_id, embedding_model, rag_strategy, agent_type,
                chunks_per_search, final_context_size, similarity_threshold,
                number_of_queries, reranking_enabled, reranking_model,
                vector_weight, keyword_weight
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(created.id)
        .bind(&settings.embedding_model)
        .bind(&settings.rag_strategy)
        .bind(&settings.agent_type)
        .bind(settings.chunks_per_search)
        .bind(settings.final_context_size)
        .bind(settings.similarity_threshold)
        .bind(settings.number_of_queries)
        .bind(settings.reranking_enabled)
        .bind(&settings.reranking_model)
        .bind(settings.vector_weight)
        .bind(settings.keyword_weight)
        .execute(&mut *tx)
        .await;

        if let Err(e) = settings_result {
            warn!("Project settings insert failed, rolling back project {}: {}", created.id, e);
            tx.rollback().await?;
            return Err(e.into());
        }

        tx.commit().await?;
        debug!("Created project {} with default settings", created.id);
        Ok(created)
    }

    async fn get_project(&self, clerk_id: &str, id: Uuid) -> Result<Option<Project>, StoreError> {
        let query = format!(
            "SELECT {} FROM projects WHERE id = $1 AND clerk_id = $2",
            PROJECT_COLUMNS
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(clerk_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(project)
    }

    async fn delete_project(&self, clerk_id: &str, id: Uuid) -> Result<Option<Project>, StoreError> {
        let query = format!(
            "DELETE FROM projects WHERE id = $1 AND clerk_id = $2 RETURNING {}",
            PROJECT_COLUMNS
        );
        let deleted = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(clerk_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deleted)
    }

    async fn get_project_settings(
        &self,
        project_id: Uuid,
        clerk_id: Option<&str>,
    ) -> Result<Option<ProjectSettings>, StoreError> {
        let settings = match clerk_id {
            Some(owner) => {
                sqlx::query_as::<_, ProjectSettings>(
                    r#"
                    SELECT s.*
                    FROM project_settings s
                    JOIN projects p ON p.id = s.project_id
                    WHERE s.project_id = $1 AND p.clerk_id = $2
                    "#,
                )
                .bind(project_id)
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProjectSettings>(
                    "SELECT * FROM project_settings WHERE project_id = $1",
                )
                .bind(project_id)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(settings)
    }

    async fn list_project_chats(&self, clerk_id: &str, project_id: Uuid) -> Result<Vec<Chat>, StoreError> {
        let query = format!(
            "SELECT {} FROM chats WHERE project_id = $1 AND clerk_id = $2 ORDER BY created_at DESC",
            CHAT_COLUMNS
        );
        let chats = sqlx::query_as::<_, Chat>(&query)
            .bind(project_id)
            .bind(clerk_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(chats)
    }

    async fn list_project_documents(
        &self,
        clerk_id: &str,
        project_id: Uuid,
    ) -> Result<Vec<ProjectDocument>, StoreError> {
        let query = format!(
            "SELECT {} FROM project_documents WHERE project_id = $1 AND clerk_id = $2 ORDER BY created_at DESC",
            DOCUMENT_COLUMNS
        );
        let documents = sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(project_id)
            .bind(clerk_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(documents)
    }

    async fn insert_chat(&self, chat: NewChat) -> Result<Chat, StoreError> {
        let query = format!(
            "INSERT INTO chats (project_id, clerk_id, title) VALUES ($1, $2, $3) RETURNING {}",
            CHAT_COLUMNS
        );
        let created = sqlx::query_as::<_, Chat>(&query)
            .bind(chat.project_id)
            .bind(&chat.clerk_id)
            .bind(&chat.title)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn delete_chat(&self, clerk_id: &str, id: Uuid) -> Result<Option<Chat>, StoreError> {
        let query = format!(
            "DELETE FROM chats WHERE id = $1 AND clerk_id = $2 RETURNING {}",
            CHAT_COLUMNS
        );
        let deleted = sqlx::query_as::<_, Chat>(&query)
            .bind(id)
            .bind(clerk_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deleted)
    }
}
