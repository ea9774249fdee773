//! Per-request trace id, span and completion log.
//!
//! Wire it outermost so every other middleware and handler runs inside the
//! span and can read the id through `trace_ctx`:
//!
//! ```ignore
//! App::new()
//!     .wrap(cors_middleware())
//!     .wrap(RequestTrace)
//! ```

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, StatusCode};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::trace_ctx::{self, TraceId};

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let trace_id = Uuid::new_v4().to_string();
        let method = req.method().to_string();
        let path = req.path().to_string();

        req.extensions_mut().insert(TraceId(trace_id.clone()));

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %method,
            path = %path
        );

        // Inner middleware may answer synchronously from `call`, so the
        // task-local must be set before it runs, not only while polling.
        let fut = span.in_scope(|| {
            trace_ctx::sync_with_trace_id(trace_id.clone(), || self.service.call(req))
        });

        Box::pin(
            trace_ctx::with_trace_id(trace_id.clone(), async move {
                let result = fut.await;

                let status = match &result {
                    Ok(res) => res.status(),
                    Err(err) => err.as_response_error().status_code(),
                };
                let duration_us = start.elapsed().as_micros() as u64;
                log_completion(status, duration_us);

                let mut res = result?;
                if let Ok(value) = header::HeaderValue::from_str(&trace_id) {
                    res.headers_mut()
                        .insert(header::HeaderName::from_static("x-request-id"), value);
                }
                Ok(res)
            })
            .instrument(span),
        )
    }
}

/// Rejected credentials are routine traffic and stay at `debug`.
fn log_completion(status: StatusCode, duration_us: u64) {
    let status_code = status.as_u16();

    if status.is_server_error() {
        error!(http.status_code = status_code, duration_us, "request_completed");
    } else if status == StatusCode::UNAUTHORIZED {
        debug!(http.status_code = status_code, duration_us, "request_completed");
    } else if status.is_client_error() {
        warn!(http.status_code = status_code, duration_us, "request_completed");
    } else {
        info!(http.status_code = status_code, duration_us, "request_completed");
    }
}
