// handlers/protected/mod.rs - Handlers behind the bearer auth middleware.
// Every storage call here is scoped by the caller's clerk_id.
pub mod chats;
pub mod files;
pub mod projects;
