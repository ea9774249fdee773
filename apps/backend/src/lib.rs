#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod trace_ctx;
pub mod users;

// Re-exports for public API
pub use auth::{AuthError, AuthenticatedUser, Claims, TokenClass, TokenIssuer, TokenPair};
pub use error::AppError;
pub use extractors::{CurrentUser, MaybeUser};
pub use middleware::{cors_middleware, RequestTrace, TokenGate};
pub use state::{AppState, SecurityConfig};
pub use users::{InMemoryUserDirectory, UserDirectory};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
