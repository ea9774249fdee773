use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::error::AuthError;
use crate::errors::{ConflictKind, DomainError, ErrorCode};
use crate::trace_ctx;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// HTTP status
    pub code: u16,
    pub message: String,
    pub error: ErrorCode,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Every authentication failure; only `code` and the message differ.
    #[error("Unauthorized: {detail}")]
    Unauthorized { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Validation { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Client-facing message. Server-side failures never leak their detail.
    fn message(&self) -> String {
        match self {
            AppError::Unauthorized { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::Validation { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Config { .. } | AppError::Internal { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Config { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn unauthorized(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Unauthorized {
            code,
            detail: detail.into(),
        }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationError,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code: ErrorCode::BadRequest,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.status().as_u16(),
            message: self.message(),
            error: self.code(),
            trace_id: trace_ctx::trace_id(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let (code, detail) = match err {
            AuthError::MissingCredential => {
                (ErrorCode::MissingCredential, "Authorization header required")
            }
            AuthError::MalformedCredential => (
                ErrorCode::MalformedCredential,
                "Invalid authorization header format",
            ),
            AuthError::InvalidSignature => (ErrorCode::InvalidToken, "Invalid token"),
            AuthError::ExpiredToken => (ErrorCode::ExpiredToken, "Token expired"),
            AuthError::WrongTokenClass { .. } => (ErrorCode::WrongTokenType, "Wrong token type"),
            AuthError::Configuration(detail) => return AppError::Config { detail },
        };
        AppError::unauthorized(code, detail)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(detail) => AppError::invalid(detail),
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::Username => ErrorCode::UsernameTaken,
                    ConflictKind::Email => ErrorCode::EmailTaken,
                };
                AppError::Conflict { code, detail }
            }
            DomainError::NotFound(detail) => AppError::NotFound {
                code: ErrorCode::UserNotFound,
                detail,
            },
            DomainError::InvalidCredentials => AppError::unauthorized(
                ErrorCode::InvalidCredentials,
                "Invalid username or password",
            ),
            DomainError::AccountDisabled => {
                AppError::forbidden(ErrorCode::AccountDisabled, "Account is disabled")
            }
            DomainError::IncorrectPassword => AppError::BadRequest {
                code: ErrorCode::IncorrectPassword,
                detail: "Current password is incorrect".to_string(),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Config { detail } | AppError::Internal { detail } = self {
            error!(error.code = %self.code(), detail = %detail, "request failed with server error");
        }

        let body = self.body();
        HttpResponse::build(self.status())
            .insert_header(("x-trace-id", body.trace_id.clone()))
            .json(body)
    }
}
