//! Claims carried inside backend-issued tokens and the identity the gate
//! injects into each request.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Discriminates the two token kinds. A token of one class is never accepted
/// where the other is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed payload of an access or refresh token.
///
/// Field names on the wire follow the registered JWT claim names; the
/// identity fields are denormalized so the gate never needs a user lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier (UUID string)
    #[serde(rename = "sub")]
    pub subject_id: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "typ")]
    pub token_class: TokenClass,
    /// Issued-at (seconds since epoch)
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Not-before (seconds since epoch)
    #[serde(rename = "nbf")]
    pub not_before: i64,
    /// Expiry (seconds since epoch)
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Unique per token; reserved for a future denylist.
    #[serde(rename = "jti")]
    pub token_id: String,
}

impl Claims {
    pub fn identity(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            subject_id: self.subject_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Verified identity handed to the issuer and injected into request
/// extensions by the token gate. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    #[serde(rename = "user_id")]
    pub subject_id: String,
    pub username: String,
    pub email: String,
}

impl AuthenticatedUser {
    pub fn new(
        subject_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            username: username.into(),
            email: email.into(),
        }
    }
}
