// handlers/mod.rs - Handler tiers
//
// Public (no auth): liveness and identity-provider webhook ingestion
// Protected (bearer auth): caller-scoped project, file and chat operations
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id, rejecting malformed values before any storage call
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::bad_request(format!("Invalid {} id '{}'", kind, raw)))
}
