//! Machine-readable error codes for the API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every variant maps 1:1 to the SCREAMING_SNAKE_CASE string that appears in
//! the `error` field of a response body.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// No Authorization header
    MissingCredential,
    /// Authorization header is not `Bearer <token>`
    MalformedCredential,
    /// Signature mismatch or unparseable token
    InvalidToken,
    /// Token past its expiry
    ExpiredToken,
    /// Access token where a refresh token is required, or vice versa
    WrongTokenType,
    /// Unknown account or bad password
    InvalidCredentials,
    /// Account exists but may not sign in
    AccountDisabled,
    /// Current password did not match on a password change
    IncorrectPassword,

    // Request validation
    ValidationError,
    BadRequest,

    // Resources
    UserNotFound,

    // Conflicts
    UsernameTaken,
    EmailTaken,

    // System
    ConfigError,
    Internal,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::MalformedCredential => "MALFORMED_CREDENTIAL",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::WrongTokenType => "WRONG_TOKEN_TYPE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::UserNotFound => "USER_NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",

            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }

    /// Every code, for exhaustiveness checks in tests.
    pub const ALL: [ErrorCode; 15] = [
        Self::MissingCredential,
        Self::MalformedCredential,
        Self::InvalidToken,
        Self::ExpiredToken,
        Self::WrongTokenType,
        Self::InvalidCredentials,
        Self::AccountDisabled,
        Self::IncorrectPassword,
        Self::ValidationError,
        Self::BadRequest,
        Self::UserNotFound,
        Self::UsernameTaken,
        Self::EmailTaken,
        Self::ConfigError,
        Self::Internal,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
