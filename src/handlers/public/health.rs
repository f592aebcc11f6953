use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Production Ready RAG API is up and running!",
        "data": {
            "name": "Production Ready RAG API",
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

/// GET /health - liveness plus a storage round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "version": version,
                "storage": "ok",
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check storage ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "version": version,
                    "storage_error": e.to_string(),
                })),
            )
        }
    }
}
