//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC strings carrying algorithm, cost parameters and salt, so
//! they can be stored as-is by the user directory.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::distr::Alphanumeric;
use rand::Rng;
use tracing::{debug, error, warn};

use super::error::AuthError;

#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Argon2id with the crate's default (OWASP-recommended) cost parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Two calls with the same input yield different digests. Fails only if
    /// the hashing primitive itself fails, which is a deployment problem.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "password hashing failed");
                AuthError::configuration("password hashing failed")
            })
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// Returns `false` for a mismatch and for a malformed digest alike.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "stored password digest is malformed");
                return false;
            }
        };

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(ArgonError::Password) => {
                debug!("password mismatch");
                false
            }
            Err(e) => {
                error!(error = %e, "password verification error");
                false
            }
        }
    }

    /// Spend roughly the cost of a real verification for an account that
    /// does not exist, so response timing does not reveal which logins are
    /// registered. Always returns `false`.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let len = rand::rng().random_range(16..32);
        let dummy: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();

        if let Ok(digest) = self.hash(&dummy) {
            let _ = self.verify(plaintext, &digest);
        }

        false
    }
}
