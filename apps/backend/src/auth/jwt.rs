use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::{AuthenticatedUser, Claims, TokenClass};
use super::error::AuthError;
use crate::state::security_config::SecurityConfig;

/// A matched access/refresh pair minted at the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds
    pub expires_in: i64,
    /// Refresh-token lifetime in seconds
    pub refresh_expires_in: i64,
}

/// Mints and verifies HS256 tokens with an injected [`SecurityConfig`].
///
/// Stateless: nothing is written anywhere on issue, and verification only
/// reads the configuration snapshot, so one instance is shared freely
/// across workers.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    security: SecurityConfig,
}

impl TokenIssuer {
    pub fn new(security: SecurityConfig) -> Self {
        Self { security }
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    /// Mint an access and a refresh token for an identity the caller has
    /// already verified. Both carry a fresh `jti` and `iat = now`.
    ///
    /// Errors only with [`AuthError::Configuration`].
    pub fn issue(
        &self,
        identity: &AuthenticatedUser,
        now: OffsetDateTime,
    ) -> Result<TokenPair, AuthError> {
        self.security.validate()?;

        let access_token = self.mint(identity, TokenClass::Access, now)?;
        let refresh_token = self.mint(identity, TokenClass::Refresh, now)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.security.access_ttl,
            refresh_expires_in: self.security.refresh_ttl,
        })
    }

    /// Exchange a refresh token for a brand-new pair.
    ///
    /// Refresh tokens rotate: the returned pair includes a new refresh token,
    /// so a client should discard the one it presented.
    pub fn refresh(&self, refresh_token: &str, now: OffsetDateTime) -> Result<TokenPair, AuthError> {
        let claims = self.verify(refresh_token, TokenClass::Refresh, now)?;
        self.issue(&claims.identity(), now)
    }

    /// Verify a token and return its claims.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// signature/structure → expiry → token class.
    ///
    /// Errors:
    /// - bad signature, malformed token, `nbf` in the future → `InvalidSignature`
    /// - `exp < now` → `ExpiredToken` (a token is still valid in its `exp` second)
    /// - class differs from `expected` → `WrongTokenClass`
    pub fn verify(
        &self,
        token: &str,
        expected: TokenClass,
        now: OffsetDateTime,
    ) -> Result<Claims, AuthError> {
        self.security.validate()?;

        // Time-based checks run below against the injected clock, with no leeway.
        let mut validation = Validation::new(self.security.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "nbf", "iss"]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.security.jwt_secret),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => debug!("token signature mismatch"),
                kind => debug!(error = ?kind, "token could not be decoded"),
            }
            AuthError::InvalidSignature
        })?;

        let now_ts = now.unix_timestamp();
        if claims.expires_at < now_ts {
            return Err(AuthError::ExpiredToken);
        }
        if claims.not_before > now_ts {
            debug!(token_id = %claims.token_id, "token used before nbf");
            return Err(AuthError::InvalidSignature);
        }

        if claims.issuer != self.security.issuer {
            warn!(
                token_id = %claims.token_id,
                token_issuer = %claims.issuer,
                "token issuer differs from configured issuer"
            );
        }

        if claims.token_class != expected {
            return Err(AuthError::WrongTokenClass {
                expected,
                actual: claims.token_class,
            });
        }

        Ok(claims)
    }

    fn mint(
        &self,
        identity: &AuthenticatedUser,
        token_class: TokenClass,
        now: OffsetDateTime,
    ) -> Result<String, AuthError> {
        let iat = now.unix_timestamp();
        let ttl = match token_class {
            TokenClass::Access => self.security.access_ttl,
            TokenClass::Refresh => self.security.refresh_ttl,
        };

        let expires_at = iat.checked_add(ttl).ok_or_else(|| {
            AuthError::configuration(format!("{token_class} token lifetime overflows expiry"))
        })?;

        let claims = Claims {
            subject_id: identity.subject_id.clone(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            token_class,
            issued_at: iat,
            not_before: iat,
            expires_at,
            issuer: self.security.issuer.clone(),
            token_id: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(self.security.algorithm),
            &claims,
            &EncodingKey::from_secret(&self.security.jwt_secret),
        )
        .map_err(|e| AuthError::configuration(format!("failed to sign {token_class} token: {e}")))
    }
}
