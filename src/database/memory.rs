use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::models::{
    Chat, NewChat, NewProject, NewProjectSettings, Project, ProjectDocument, ProjectSettings, User,
};
use crate::database::store::{Store, StoreError};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    project_settings: Vec<ProjectSettings>,
    chats: Vec<Chat>,
    project_documents: Vec<ProjectDocument>,
}

/// In-process store with the same constraints as the Postgres schema
/// (unique `clerk_id` on users, one settings row per project, cascading
/// project deletes). Used for local runs without a database and for tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    fail_settings_inserts: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent project settings insert fail
    pub fn fail_settings_inserts(&self, fail: bool) {
        self.fail_settings_inserts.store(fail, Ordering::SeqCst);
    }

    /// Seed a document row; documents have no create endpoint
    pub async fn insert_document(
        &self,
        clerk_id: &str,
        project_id: Uuid,
        filename: &str,
    ) -> Result<ProjectDocument, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.iter().any(|p| p.id == project_id) {
            return Err(foreign_key_violation("project_documents"));
        }
        let document = ProjectDocument {
            id: Uuid::new_v4(),
            project_id,
            clerk_id: clerk_id.to_string(),
            filename: filename.to_string(),
            s3_key: None,
            file_size: None,
            file_type: None,
            processing_status: "pending".to_string(),
            created_at: Utc::now(),
        };
        tables.project_documents.push(document.clone());
        Ok(document)
    }

    /// Project lookup without owner scoping, for assertions
    pub async fn project_exists(&self, id: Uuid) -> bool {
        self.tables.read().await.projects.iter().any(|p| p.id == id)
    }

    pub async fn project_count(&self) -> usize {
        self.tables.read().await.projects.len()
    }

    pub async fn settings_count(&self) -> usize {
        self.tables.read().await.project_settings.len()
    }
}

fn foreign_key_violation(table: &str) -> StoreError {
    StoreError::Query(format!(
        "insert or update on table \"{}\" violates foreign key constraint",
        table
    ))
}

/// Clone matching rows, newest first. Ties keep reverse insertion order.
fn newest_first<T: Clone>(
    rows: &[T],
    keep: impl Fn(&T) -> bool,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().filter(|r| keep(*r)).cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, clerk_id: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.clerk_id == clerk_id) {
            return Err(StoreError::Query(
                "duplicate key value violates unique constraint \"users_clerk_id_key\"".to_string(),
            ));
        }
        let user = User {
            id: Uuid::new_v4(),
            clerk_id: clerk_id.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn list_projects(&self, clerk_id: &str) -> Result<Vec<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .filter(|p| p.clerk_id == clerk_id)
            .cloned()
            .collect())
    }

    async fn create_project(
        &self,
        project: NewProject,
        settings: NewProjectSettings,
    ) -> Result<Project, StoreError> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let created = Project {
            id: Uuid::new_v4(),
            clerk_id: project.clerk_id,
            name: project.name,
            description: project.description,
            created_at: now,
        };
        tables.projects.push(created.clone());

        if self.fail_settings_inserts.load(Ordering::SeqCst) {
            tables.projects.retain(|p| p.id != created.id);
            warn!("Project settings insert failed, removed project {}", created.id);
            return Err(StoreError::Query(
                "failed to insert project settings".to_string(),
            ));
        }

        let row = settings.into_row(Uuid::new_v4(), created.id, now);
        tables.project_settings.push(row);

        debug!("Created project {} with default settings", created.id);
        Ok(created)
    }

    async fn get_project(&self, clerk_id: &str, id: Uuid) -> Result<Option<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .find(|p| p.id == id && p.clerk_id == clerk_id)
            .cloned())
    }

    async fn delete_project(&self, clerk_id: &str, id: Uuid) -> Result<Option<Project>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .projects
            .iter()
            .position(|p| p.id == id && p.clerk_id == clerk_id)
        else {
            return Ok(None);
        };

        let deleted = tables.projects.remove(index);
        tables.project_settings.retain(|s| s.project_id != id);
        tables.chats.retain(|c| c.project_id != id);
        tables.project_documents.retain(|d| d.project_id != id);
        Ok(Some(deleted))
    }

    async fn get_project_settings(
        &self,
        project_id: Uuid,
        clerk_id: Option<&str>,
    ) -> Result<Option<ProjectSettings>, StoreError> {
        let tables = self.tables.read().await;
        if let Some(owner) = clerk_id {
            let owned = tables
                .projects
                .iter()
                .any(|p| p.id == project_id && p.clerk_id == owner);
            if !owned {
                return Ok(None);
            }
        }
        Ok(tables
            .project_settings
            .iter()
            .find(|s| s.project_id == project_id)
            .cloned())
    }

    async fn list_project_chats(&self, clerk_id: &str, project_id: Uuid) -> Result<Vec<Chat>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.chats.as_slice(),
            |c| c.project_id == project_id && c.clerk_id == clerk_id,
            |c| c.created_at,
        ))
    }

    async fn list_project_documents(
        &self,
        clerk_id: &str,
        project_id: Uuid,
    ) -> Result<Vec<ProjectDocument>, StoreError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.project_documents.as_slice(),
            |d| d.project_id == project_id && d.clerk_id == clerk_id,
            |d| d.created_at,
        ))
    }

    async fn insert_chat(&self, chat: NewChat) -> Result<Chat, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.iter().any(|p| p.id == chat.project_id) {
            return Err(foreign_key_violation("chats"));
        }
        let created = Chat {
            id: Uuid::new_v4(),
            project_id: chat.project_id,
            clerk_id: chat.clerk_id,
            title: chat.title,
            created_at: Utc::now(),
        };
        tables.chats.push(created.clone());
        Ok(created)
    }

    async fn delete_chat(&self, clerk_id: &str, id: Uuid) -> Result<Option<Chat>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .chats
            .iter()
            .position(|c| c.id == id && c.clerk_id == clerk_id)
        else {
            return Ok(None);
        };
        Ok(Some(tables.chats.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_project(owner: &str, name: &str) -> NewProject {
        NewProject {
            clerk_id: owner.to_string(),
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn create_project_writes_settings_row() {
        let store = MemoryStore::new();
        let project = store
            .create_project(new_project("user_a", "Demo"), NewProjectSettings::default())
            .await
            .unwrap();

        let settings = store.get_project_settings(project.id, None).await.unwrap().unwrap();
        assert_eq!(settings.project_id, project.id);
        assert_eq!(settings.similarity_threshold, 0.3);
    }

    #[tokio::test]
    async fn failed_settings_insert_leaves_no_project() {
        let store = MemoryStore::new();
        store.fail_settings_inserts(true);

        let result = store
            .create_project(new_project("user_a", "Demo"), NewProjectSettings::default())
            .await;

        assert!(result.is_err());
        assert_eq!(store.project_count().await, 0);
        assert_eq!(store.settings_count().await, 0);
    }

    #[tokio::test]
    async fn owner_scoped_lookups_ignore_other_callers() {
        let store = MemoryStore::new();
        let project = store
            .create_project(new_project("user_a", "Demo"), NewProjectSettings::default())
            .await
            .unwrap();

        assert!(store.get_project("user_b", project.id).await.unwrap().is_none());
        assert!(store.delete_project("user_b", project.id).await.unwrap().is_none());
        assert!(store.project_exists(project.id).await);
        assert!(store
            .get_project_settings(project.id, Some("user_b"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn chats_list_newest_first() {
        let store = MemoryStore::new();
        let project = store
            .create_project(new_project("user_a", "Demo"), NewProjectSettings::default())
            .await
            .unwrap();

        for title in ["first", "second", "third"] {
            store
                .insert_chat(NewChat {
                    project_id: project.id,
                    clerk_id: "user_a".to_string(),
                    title: title.to_string(),
                })
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .list_project_chats("user_a", project.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn deleting_project_cascades() {
        let store = MemoryStore::new();
        let project = store
            .create_project(new_project("user_a", "Demo"), NewProjectSettings::default())
            .await
            .unwrap();
        store.insert_document("user_a", project.id, "notes.pdf").await.unwrap();

        store.delete_project("user_a", project.id).await.unwrap().unwrap();

        assert_eq!(store.settings_count().await, 0);
        assert!(store
            .list_project_documents("user_a", project.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn duplicate_users_are_rejected() {
        let store = MemoryStore::new();
        store.insert_user("user_a").await.unwrap();
        assert!(matches!(store.insert_user("user_a").await, Err(StoreError::Query(_))));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn chat_requires_existing_project() {
        let store = MemoryStore::new();
        let result = store
            .insert_chat(NewChat {
                project_id: Uuid::new_v4(),
                clerk_id: "user_a".to_string(),
                title: "orphan".to_string(),
            })
            .await;
        assert!(matches!(result, Err(StoreError::Query(_))));
    }
}
