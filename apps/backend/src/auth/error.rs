//! Token lifecycle failures.
//!
//! This type is HTTP-agnostic. The web boundary converts it into
//! `AppError` via the `From<AuthError>` implementation in `crate::error`.

use thiserror::Error;

use super::claims::TokenClass;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No Authorization header.
    #[error("missing credential")]
    MissingCredential,
    /// Header present but not `Bearer <token>`.
    #[error("malformed credential")]
    MalformedCredential,
    /// Bad signature or structurally unparseable token.
    #[error("invalid token")]
    InvalidSignature,
    #[error("expired token")]
    ExpiredToken,
    #[error("wrong token type: expected {expected}, got {actual}")]
    WrongTokenClass {
        expected: TokenClass,
        actual: TokenClass,
    },
    /// Deployment misconfiguration; fatal to the request, never the client's fault.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::Configuration(detail.into())
    }

    /// Short reason label used in logs.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::InvalidSignature => "invalid_token",
            Self::ExpiredToken => "expired_token",
            Self::WrongTokenClass { .. } => "wrong_token_type",
            Self::Configuration(_) => "configuration",
        }
    }
}
