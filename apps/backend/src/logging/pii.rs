//! Masking of personal data and credentials before they reach the logs.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

/// Compact JWS: three base64url segments separated by dots.
static COMPACT_JWT: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\beyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").unwrap()
});

/// Opaque secrets: long base64/hex runs.
static OPAQUE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9+/_-]{32,}={0,2}").unwrap()
});

/// Mask e-mail local parts and any token-shaped runs in `input`.
///
/// Tokens are masked before e-mails so a JWT payload never gets
/// half-rewritten by the e-mail pattern.
pub fn redact(input: &str) -> String {
    let no_jwt = COMPACT_JWT.replace_all(input, "[REDACTED_JWT]");
    let no_opaque = OPAQUE_TOKEN.replace_all(&no_jwt, "[REDACTED_TOKEN]");

    EMAIL
        .replace_all(&no_opaque, |caps: &Captures| {
            let full = &caps[0];
            match full.split_once('@') {
                Some((local, domain)) => match local.chars().next() {
                    Some(first) => format!("{first}***@{domain}"),
                    None => format!("@{domain}"),
                },
                None => full.to_string(),
            }
        })
        .into_owned()
}

/// Formats its contents through [`redact`].
///
/// ```ignore
/// warn!(email = %Redacted(&email), "login failed");
/// ```
#[derive(Clone, Copy)]
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", redact(self.0))
    }
}
