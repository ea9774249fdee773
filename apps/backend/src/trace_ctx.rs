//! Per-request trace id, reachable from anywhere inside the request future.
//!
//! `RequestTrace` generates the id, stores a [`TraceId`] in the request
//! extensions and runs the downstream service inside [`with_trace_id`], so
//! error bodies and audit events can pick it up without threading it through
//! every call.

use std::cell::RefCell;
use std::future::Future;

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Request-extension copy of the trace id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// Trace id of the current task, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}

/// Synchronous counterpart of [`with_trace_id`], for the part of a
/// middleware `call` that runs before its future is polled.
pub fn sync_with_trace_id<F, R>(trace_id: String, f: F) -> R
where
    F: FnOnce() -> R,
{
    TRACE_ID.sync_scope(RefCell::new(Some(trace_id)), f)
}
