use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub clerk_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the owner always comes from the authenticated caller
#[derive(Debug, Clone)]
pub struct NewProject {
    pub clerk_id: String,
    pub name: String,
    pub description: String,
}
