// POST /create-user, GET /get-users
//
// Identity-provider webhook ingestion. Signature verification of the
// webhook is not performed here.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const USER_CREATED: &str = "user.created";

/// Pull the new user's external id out of a webhook event envelope
fn extract_created_user_id(event: &Value) -> Result<&str, ApiError> {
    let event_type = event.get("type").and_then(Value::as_str);
    if event_type != Some(USER_CREATED) {
        return Err(ApiError::validation_error(
            format!(
                "Unsupported webhook event type '{}'",
                event_type.unwrap_or_default()
            ),
            Some("type"),
        ));
    }

    event
        .get("data")
        .and_then(|data| data.get("id"))
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::validation_error("No user ID in webhook", Some("data.id")))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<User> {
    let Json(event) = payload?;
    let clerk_id = extract_created_user_id(&event)?;

    let user = state
        .store
        .insert_user(clerk_id)
        .await
        .map_err(|e| ApiError::storage("Webhook processing failed", e))?;

    tracing::info!("User {} created from webhook", user.clerk_id);
    Ok(ApiResponse::success("User created successfully", user))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state
        .store
        .list_users()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch users", e))?;

    Ok(ApiResponse::success("Users fetched successfully", users))
}
