use std::env;

use jsonwebtoken::Algorithm;
use rand::RngCore;

use crate::auth::error::AuthError;

/// Default access-token lifetime (1 hour).
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;
/// Default refresh-token lifetime (7 days).
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 604_800;
/// Upper bound for either lifetime (10 years).
pub const MAX_TTL_SECS: i64 = 315_360_000;
/// Default `iss` claim.
pub const DEFAULT_ISSUER: &str = "english-learning";

/// Configuration for token signing and lifetimes.
///
/// Built once at startup and passed explicitly to the issuer and gate;
/// never read from ambient global state.
#[derive(Clone)]
pub struct SecurityConfig {
    /// Shared HMAC secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    /// Access-token lifetime in seconds
    pub access_ttl: i64,
    /// Refresh-token lifetime in seconds
    pub refresh_ttl: i64,
    /// Value of the `iss` claim
    pub issuer: String,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret and default lifetimes
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl: DEFAULT_REFRESH_TTL_SECS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    pub fn with_access_ttl(mut self, secs: i64) -> Self {
        self.access_ttl = secs;
        self
    }

    pub fn with_refresh_ttl(mut self, secs: i64) -> Self {
        self.refresh_ttl = secs;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Load from the process environment.
    ///
    /// - `JWT_SECRET` (required)
    /// - `JWT_ACCESS_TOKEN_TTL` seconds (default 3600)
    /// - `JWT_REFRESH_TOKEN_TTL` seconds (default 604800)
    /// - `APP_NAME` issuer (default `english-learning`)
    pub fn from_env() -> Result<Self, AuthError> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| AuthError::configuration("JWT_SECRET must be set"))?;

        let mut config = Self::new(secret.into_bytes());
        if let Some(ttl) = ttl_from_env("JWT_ACCESS_TOKEN_TTL")? {
            config.access_ttl = ttl;
        }
        if let Some(ttl) = ttl_from_env("JWT_REFRESH_TOKEN_TTL")? {
            config.refresh_ttl = ttl;
        }
        if let Ok(name) = env::var("APP_NAME") {
            if !name.trim().is_empty() {
                config.issuer = name.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce sound tokens.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt_secret.is_empty() {
            return Err(AuthError::configuration("signing secret is empty"));
        }
        if self.access_ttl <= 0 || self.refresh_ttl <= 0 {
            return Err(AuthError::configuration("token lifetimes must be positive"));
        }
        if self.access_ttl > MAX_TTL_SECS || self.refresh_ttl > MAX_TTL_SECS {
            return Err(AuthError::configuration(format!(
                "token lifetimes must not exceed {MAX_TTL_SECS} seconds"
            )));
        }
        if self.access_ttl >= self.refresh_ttl {
            return Err(AuthError::configuration(
                "access token lifetime must be shorter than refresh token lifetime",
            ));
        }
        Ok(())
    }

    /// Config with a random 32-byte secret, distinct per call.
    pub fn for_tests() -> Self {
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::new(secret.to_vec())
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

fn ttl_from_env(key: &str) -> Result<Option<i64>, AuthError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Some)
            .ok_or_else(|| AuthError::configuration(format!("{key} must be a positive integer"))),
        Err(_) => Ok(None),
    }
}
