//! User lookup collaborator.
//!
//! The token machinery never touches storage; login, registration and
//! refresh go through a [`UserDirectory`] to resolve and validate accounts.

mod memory;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

pub use memory::InMemoryUserDirectory;

use crate::auth::claims::AuthenticatedUser;
use crate::errors::DomainError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 6;

static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z0-9_]+$").unwrap()
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// UUID v4, used verbatim as the token subject id
    pub id: String,
    pub username: String,
    /// Normalised (NFKC, lowercase)
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub status: AccountStatus,
}

impl UserRecord {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn identity(&self) -> AuthenticatedUser {
        AuthenticatedUser::new(self.id.clone(), self.username.clone(), self.email.clone())
    }
}

/// Registration input after validation, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, DomainError>;

    /// `account` is a username, or an e-mail address when it contains `@`.
    async fn find_by_login(&self, account: &str) -> Result<Option<UserRecord>, DomainError>;

    /// Fails with `Conflict` when the username or e-mail is already taken.
    async fn create(&self, user: NewUser) -> Result<UserRecord, DomainError>;

    async fn set_status(&self, id: &str, status: AccountStatus) -> Result<(), DomainError>;

    /// Replace the stored hash. Fails with `NotFound` for an unknown id.
    async fn update_password(&self, id: &str, password_hash: String) -> Result<(), DomainError>;
}

/// Trim, NFKC-normalise and lowercase an e-mail address.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(DomainError::validation(format!(
            "username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"
        )));
    }
    if !USERNAME.is_match(username) {
        return Err(DomainError::validation(
            "username may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if EMAIL.is_match(email) {
        Ok(())
    } else {
        Err(DomainError::validation("invalid email address"))
    }
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}
