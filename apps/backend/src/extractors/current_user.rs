use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::auth::claims::AuthenticatedUser;
use crate::auth::error::AuthError;
use crate::error::AppError;

/// Identity admitted by `TokenGate`.
///
/// Fails with 401 `MISSING_CREDENTIAL` when the route is not behind a gate
/// or the optional gate let the request through anonymously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser(pub AuthenticatedUser);

impl Deref for CurrentUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            admitted(req)
                .map(CurrentUser)
                .ok_or_else(|| AuthError::MissingCredential.into()),
        )
    }
}

/// Identity if the gate admitted one; never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl MaybeUser {
    pub fn into_inner(self) -> Option<AuthenticatedUser> {
        self.0
    }
}

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(admitted(req))))
    }
}

fn admitted(req: &HttpRequest) -> Option<AuthenticatedUser> {
    req.extensions().get::<AuthenticatedUser>().cloned()
}
