//! `SECURITY_*` audit events.
//!
//! Sign-in, refresh and password-change failures are emitted at `warn`. Token-class misuse is
//! rejected at the gate like any other bad credential and stays at `debug`;
//! filter on `event` to alert on it.

use tracing::{debug, warn};

use crate::auth::claims::TokenClass;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A sign-in attempt failed. `account` is the submitted username or e-mail.
pub fn login_failed(reason: &str, account: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        account = %Redacted(account),
        reason,
        "Authentication failure"
    );
}

/// A token of one class was presented where the other class is required.
pub fn token_class_misuse(expected: TokenClass, actual: TokenClass) {
    let trace_id = trace_ctx::trace_id();

    debug!(
        event = "SECURITY_TOKEN_CLASS_MISUSE",
        %trace_id,
        expected = expected.as_str(),
        actual = actual.as_str(),
        "Token used outside its class"
    );
}

/// A refresh token was valid but its subject no longer exists or may not sign in.
pub fn refresh_for_inactive_subject(subject_id: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_REFRESH_REJECTED",
        %trace_id,
        subject_id,
        "Refresh for unknown or disabled subject"
    );
}

/// A password change presented the wrong current password.
pub fn password_change_rejected(subject_id: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_PASSWORD_CHANGE_REJECTED",
        %trace_id,
        subject_id,
        "Password change with incorrect current password"
    );
}
