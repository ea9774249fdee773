//! Error types shared below the web boundary.

pub mod domain;
pub mod error_code;

pub use domain::{ConflictKind, DomainError};
pub use error_code::ErrorCode;
