//! The request observers.
//!
//! | Observer              | On request                | On completion               |
//! |-----------------------|---------------------------|-----------------------------|
//! | `RequestLogger`       | `Incoming Request`        | one record, level by status |
//! | `SlowRequestDetector` | -                         | `Slow Request Detected`     |
//! | `AuthAttemptTagger`   | `Authentication Attempt`  | -                           |
//! | `CrudTagger`          | `CRUD Operation Detected` | -                           |

use axum::http::StatusCode;
use serde_json::json;

use crate::http::request::{Completion, RequestContext};
use crate::observability::{metrics, LogLevel, LogService};

/// A step in the observer chain. Both hooks default to doing nothing.
pub trait RequestObserver: Send + Sync {
    fn on_request(&self, _ctx: &RequestContext, _log: &LogService) {}

    fn on_response(&self, _ctx: &RequestContext, _done: &Completion, _log: &LogService) {}
}

/// Level, message and outcome label for a finished response.
pub fn completion_record(status: StatusCode) -> (LogLevel, &'static str, &'static str) {
    match status.as_u16() {
        500..=u16::MAX => (LogLevel::Error, "Server Error Response", "server_error"),
        400..=499 => (LogLevel::Warn, "Client Error Response", "client_error"),
        300..=399 => (LogLevel::Info, "Redirect Response", "redirect"),
        _ => (LogLevel::Info, "Success Response", "success"),
    }
}

pub struct RequestLogger;

impl RequestObserver for RequestLogger {
    fn on_request(&self, ctx: &RequestContext, log: &LogService) {
        log.info(
            "Incoming Request",
            json!({
                "request_id": ctx.client.request_id,
                "method": ctx.method.as_str(),
                "url": ctx.url,
                "path": ctx.path,
                "route": ctx.route,
                "ip": ctx.client.ip,
                "user_agent": ctx.client.user_agent,
            }),
        );
    }

    fn on_response(&self, ctx: &RequestContext, done: &Completion, log: &LogService) {
        let (level, message, outcome) = completion_record(done.status);
        log.log(
            level,
            message,
            json!({
                "request_id": ctx.client.request_id,
                "method": ctx.method.as_str(),
                "url": ctx.url,
                "status": done.status.as_u16(),
                "outcome": outcome,
                "duration": format!("{}ms", done.elapsed_ms()),
                "duration_ms": done.elapsed_ms() as u64,
                "content_length": done.content_length,
                "ip": ctx.client.ip,
            }),
        );
        metrics::record_request(ctx.method.as_str(), done.status.as_u16(), done.elapsed);
    }
}

pub struct SlowRequestDetector {
    threshold_ms: u64,
}

impl SlowRequestDetector {
    pub fn new(threshold_ms: u64) -> Self {
        Self { threshold_ms }
    }

    /// Strictly greater than the threshold.
    pub fn exceeds(elapsed_ms: u128, threshold_ms: u64) -> bool {
        elapsed_ms > u128::from(threshold_ms)
    }
}

impl RequestObserver for SlowRequestDetector {
    fn on_response(&self, ctx: &RequestContext, done: &Completion, log: &LogService) {
        let elapsed_ms = done.elapsed_ms();
        if !Self::exceeds(elapsed_ms, self.threshold_ms) {
            return;
        }
        log.warn(
            "Slow Request Detected",
            json!({
                "request_id": ctx.client.request_id,
                "method": ctx.method.as_str(),
                "url": ctx.url,
                "duration": format!("{}ms", elapsed_ms),
                "duration_ms": elapsed_ms as u64,
                "threshold": format!("{}ms", self.threshold_ms),
                "threshold_ms": self.threshold_ms,
            }),
        );
        metrics::record_slow_request();
    }
}

pub struct AuthAttemptTagger;

impl RequestObserver for AuthAttemptTagger {
    fn on_request(&self, ctx: &RequestContext, log: &LogService) {
        let Some(action) = ctx.tags.auth else {
            return;
        };
        log.info(
            "Authentication Attempt",
            json!({
                "request_id": ctx.client.request_id,
                "action": action,
                "method": ctx.method.as_str(),
                "path": ctx.path,
                "ip": ctx.client.ip,
                "user_agent": ctx.client.user_agent,
            }),
        );
    }
}

pub struct CrudTagger;

impl RequestObserver for CrudTagger {
    fn on_request(&self, ctx: &RequestContext, log: &LogService) {
        let Some(operation) = ctx.tags.crud else {
            return;
        };
        log.info(
            "CRUD Operation Detected",
            json!({
                "request_id": ctx.client.request_id,
                "operation": operation,
                "method": ctx.method.as_str(),
                "path": ctx.path,
                "ip": ctx.client.ip,
            }),
        );
    }
}
