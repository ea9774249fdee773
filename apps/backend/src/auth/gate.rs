//! Per-request authentication state machine.
//!
//! `START → header-present? → scheme-valid? → signature-valid? →
//! not-expired? → class==access? → ADMITTED`
//!
//! Any "no" exits to `Rejected(reason)`, or to `Anonymous` when the gate
//! runs in optional mode. The machine runs once per request and has no
//! persisted state.

use actix_web::http::header::HeaderValue;
use time::OffsetDateTime;

use super::claims::{AuthenticatedUser, TokenClass};
use super::error::AuthError;
use super::jwt::TokenIssuer;

const BEARER_PREFIX: &str = "Bearer ";

/// Whether a failed check rejects the request or lets it through anonymously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    Required,
    Optional,
}

/// Terminal state of one run of the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Admitted(AuthenticatedUser),
    Rejected(AuthError),
    Anonymous,
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is the literal `Bearer ` (case-sensitive, single space)
/// followed by a non-empty token without whitespace.
pub fn parse_bearer(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential)?;
    let value = header
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    if value.trim().is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedCredential)?;

    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(AuthError::MalformedCredential);
    }

    Ok(token)
}

/// Run the checks up to and including the access-class check.
pub fn authenticate(
    header: Option<&HeaderValue>,
    issuer: &TokenIssuer,
    now: OffsetDateTime,
) -> Result<AuthenticatedUser, AuthError> {
    let token = parse_bearer(header)?;
    let claims = issuer.verify(token, TokenClass::Access, now)?;
    Ok(claims.identity())
}

/// Run the full machine and map the result onto a terminal state.
///
/// A configuration failure is never downgraded to `Anonymous`; the
/// deployment is broken and the request must fail either way.
pub fn evaluate(
    mode: GateMode,
    header: Option<&HeaderValue>,
    issuer: &TokenIssuer,
    now: OffsetDateTime,
) -> GateOutcome {
    match authenticate(header, issuer, now) {
        Ok(user) => GateOutcome::Admitted(user),
        Err(err @ AuthError::Configuration(_)) => GateOutcome::Rejected(err),
        Err(err) => match mode {
            GateMode::Required => GateOutcome::Rejected(err),
            GateMode::Optional => GateOutcome::Anonymous,
        },
    }
}
