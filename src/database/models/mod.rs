pub mod chat;
pub mod project;
pub mod project_document;
pub mod project_settings;
pub mod user;

pub use chat::{Chat, NewChat};
pub use project::{NewProject, Project};
pub use project_document::ProjectDocument;
pub use project_settings::{NewProjectSettings, ProjectSettings};
pub use user::User;
