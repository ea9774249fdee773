//! Bearer-token gate.
//!
//! Runs the authentication state machine in `auth::gate` once per request.
//! Admitted identities are stored in request extensions as
//! `AuthenticatedUser` for the `CurrentUser`/`MaybeUser` extractors.
//!
//! `TokenGate::required()` answers rejected requests itself with the JSON
//! error body; `TokenGate::optional()` lets them through anonymously.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use time::OffsetDateTime;
use tracing::{debug, error};

use crate::auth::error::AuthError;
use crate::auth::gate::{self, GateMode, GateOutcome};
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

/// Source of "now" for expiry checks.
pub type Clock = Rc<dyn Fn() -> OffsetDateTime>;

#[derive(Clone)]
pub struct TokenGate {
    mode: GateMode,
    clock: Clock,
}

impl TokenGate {
    pub fn required() -> Self {
        Self::new(GateMode::Required)
    }

    pub fn optional() -> Self {
        Self::new(GateMode::Optional)
    }

    fn new(mode: GateMode) -> Self {
        Self {
            mode,
            clock: Rc::new(OffsetDateTime::now_utc),
        }
    }

    /// Replace the wall clock, e.g. to test expiry without sleeping.
    pub fn with_clock(mut self, clock: impl Fn() -> OffsetDateTime + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenGateMiddleware {
            service,
            mode: self.mode,
            clock: Rc::clone(&self.clock),
        }))
    }
}

pub struct TokenGateMiddleware<S> {
    service: S,
    mode: GateMode,
    clock: Clock,
}

impl<S, B> Service<ServiceRequest> for TokenGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = match req.app_data::<web::Data<AppState>>() {
            Some(state) => gate::evaluate(
                self.mode,
                req.headers().get(header::AUTHORIZATION),
                &state.issuer,
                (self.clock)(),
            ),
            None => GateOutcome::Rejected(AuthError::configuration(
                "AppState not registered for gated route",
            )),
        };

        match outcome {
            GateOutcome::Admitted(user) => {
                debug!(user_id = %user.subject_id, "request admitted");
                req.extensions_mut().insert(user);
                self.forward(req)
            }
            GateOutcome::Anonymous => {
                debug!("anonymous request on optional route");
                self.forward(req)
            }
            GateOutcome::Rejected(err) => {
                log_rejection(&err);
                let response = AppError::from(err).error_response();
                Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
            }
        }
    }
}

impl<S, B> TokenGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    fn forward(
        &self,
        req: ServiceRequest,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

fn log_rejection(err: &AuthError) {
    match err {
        AuthError::Configuration(detail) => {
            error!(reason = err.reason(), detail = %detail, "token gate misconfigured");
        }
        AuthError::WrongTokenClass { expected, actual } => {
            security::token_class_misuse(*expected, *actual);
        }
        _ => debug!(reason = err.reason(), "request rejected by token gate"),
    }
}
