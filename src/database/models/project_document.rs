use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Document uploaded into a project. Read-only from this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProjectDocument {
    pub id: Uuid,
    pub project_id: Uuid,
    pub clerk_id: String,
    pub filename: String,
    pub s3_key: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub processing_status: String,
    pub created_at: DateTime<Utc>,
}
