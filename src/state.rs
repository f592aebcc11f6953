use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::database::Store;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Require project ownership on the settings endpoint
    pub settings_owner_check: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            store,
            verifier,
            settings_owner_check: false,
        }
    }

    pub fn with_settings_owner_check(mut self, enabled: bool) -> Self {
        self.settings_owner_check = enabled;
        self
    }
}
