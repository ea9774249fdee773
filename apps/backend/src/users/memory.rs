use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use super::{normalize_email, AccountStatus, NewUser, UserDirectory, UserRecord};
use crate::errors::{ConflictKind, DomainError};

/// Process-local directory backed by concurrent maps.
///
/// Usernames are unique case-insensitively; e-mails are unique after
/// normalisation. Uniqueness is enforced by reserving index entries, so two
/// concurrent registrations for the same name cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    by_id: DashMap<String, UserRecord>,
    /// lowercase username → id
    usernames: DashMap<String, String>,
    /// normalised e-mail → id
    emails: DashMap<String, String>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn get_cloned(&self, id: &str) -> Option<UserRecord> {
        self.by_id.get(id).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.get_cloned(id))
    }

    async fn find_by_login(&self, account: &str) -> Result<Option<UserRecord>, DomainError> {
        let account = account.trim();
        let id = if account.contains('@') {
            self.emails
                .get(&normalize_email(account))
                .map(|e| e.value().clone())
        } else {
            self.usernames
                .get(&account.to_lowercase())
                .map(|e| e.value().clone())
        };

        Ok(id.and_then(|id| self.get_cloned(&id)))
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, DomainError> {
        let id = Uuid::new_v4().to_string();
        let username_key = user.username.to_lowercase();
        let email = normalize_email(&user.email);

        match self.usernames.entry(username_key.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::conflict(
                    ConflictKind::Username,
                    "username already taken",
                ))
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => {
                self.usernames.remove(&username_key);
                return Err(DomainError::conflict(
                    ConflictKind::Email,
                    "email already registered",
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let record = UserRecord {
            id: id.clone(),
            username: user.username,
            email,
            password_hash: user.password_hash,
            status: AccountStatus::Active,
        };
        self.by_id.insert(id, record.clone());
        debug!(user_id = %record.id, "user created");

        Ok(record)
    }

    async fn set_status(&self, id: &str, status: AccountStatus) -> Result<(), DomainError> {
        match self.by_id.get_mut(id) {
            Some(mut entry) => {
                entry.status = status;
                Ok(())
            }
            None => Err(DomainError::not_found(format!("user {id}"))),
        }
    }

    async fn update_password(&self, id: &str, password_hash: String) -> Result<(), DomainError> {
        match self.by_id.get_mut(id) {
            Some(mut entry) => {
                entry.password_hash = password_hash;
                debug!(user_id = %id, "password updated");
                Ok(())
            }
            None => Err(DomainError::not_found(format!("user {id}"))),
        }
    }
}
