use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub project_id: Uuid,
    pub clerk_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChat {
    pub project_id: Uuid,
    pub clerk_id: String,
    pub title: String,
}
