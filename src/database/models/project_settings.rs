use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Retrieval configuration row, one per project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProjectSettings {
    pub id: Uuid,
    pub project_id: Uuid,
    pub embedding_model: String,
    pub rag_strategy: String,
    pub agent_type: String,
    pub chunks_per_search: i32,
    pub final_context_size: i32,
    pub similarity_threshold: f64,
    pub number_of_queries: i32,
    pub reranking_enabled: bool,
    pub reranking_model: String,
    pub vector_weight: f64,
    pub keyword_weight: f64,
    pub created_at: DateTime<Utc>,
}

/// Settings written alongside a new project. The project id is filled in
/// by the store once the project row exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProjectSettings {
    pub embedding_model: String,
    pub rag_strategy: String,
    pub agent_type: String,
    pub chunks_per_search: i32,
    pub final_context_size: i32,
    pub similarity_threshold: f64,
    pub number_of_queries: i32,
    pub reranking_enabled: bool,
    pub reranking_model: String,
    pub vector_weight: f64,
    pub keyword_weight: f64,
}

impl Default for NewProjectSettings {
    fn default() -> Self {
        Self {
            embedding_model: "text-embedding-3-large".to_string(),
            rag_strategy: "basic".to_string(),
            agent_type: "agentic".to_string(),
            chunks_per_search: 10,
            final_context_size: 5,
            similarity_threshold: 0.3,
            number_of_queries: 5,
            reranking_enabled: true,
            reranking_model: "rerank-english-v3.0".to_string(),
            vector_weight: 0.7,
            keyword_weight: 0.3,
        }
    }
}

impl NewProjectSettings {
    pub fn into_row(self, id: Uuid, project_id: Uuid, created_at: DateTime<Utc>) -> ProjectSettings {
        ProjectSettings {
            id,
            project_id,
            embedding_model: self.embedding_model,
            rag_strategy: self.rag_strategy,
            agent_type: self.agent_type,
            chunks_per_search: self.chunks_per_search,
            final_context_size: self.final_context_size,
            similarity_threshold: self.similarity_threshold,
            number_of_queries: self.number_of_queries,
            reranking_enabled: self.reranking_enabled,
            reranking_model: self.reranking_model,
            vector_weight: self.vector_weight,
            keyword_weight: self.keyword_weight,
            created_at,
        }
    }
}
