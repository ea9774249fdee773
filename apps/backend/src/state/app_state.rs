use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::PasswordHasher;
use crate::users::{InMemoryUserDirectory, UserDirectory};

/// Application state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    /// Token issuer/verifier holding the security configuration
    pub issuer: TokenIssuer,
    /// User lookup collaborator for login, registration and refresh
    pub users: Arc<dyn UserDirectory>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(security: SecurityConfig, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            issuer: TokenIssuer::new(security),
            users,
            hasher: PasswordHasher::new(),
        }
    }

    /// State backed by a fresh in-memory user directory.
    pub fn in_memory(security: SecurityConfig) -> Self {
        Self::new(security, Arc::new(InMemoryUserDirectory::new()))
    }

    pub fn security(&self) -> &SecurityConfig {
        self.issuer.security()
    }

    /// In-memory state with a random signing secret.
    pub fn for_tests() -> Self {
        Self::in_memory(SecurityConfig::for_tests())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
