//! Terminal error logging.
//!
//! A panicking handler is caught by `CatchPanicLayer`, which builds a 500
//! through [`panic_response`]. That response carries a [`PanicReport`] that
//! [`error_logger`] turns into an `Unhandled Error` record.

use std::any::Any;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::http::request::ClientMeta;
use crate::observability::LogService;

/// Panic payload attached to the generated 500 response.
#[derive(Debug, Clone)]
pub struct PanicReport(pub String);

pub fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    }
}

pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response();
    response
        .extensions_mut()
        .insert(PanicReport(panic_message(err.as_ref())));
    response
}

pub async fn error_logger(State(log): State<LogService>, request: Request, next: Next) -> Response {
    let client = ClientMeta::from_request(&request);
    let method = request.method().clone();
    let url = request.uri().to_string();

    let response = next.run(request).await;

    if let Some(PanicReport(message)) = response.extensions().get::<PanicReport>() {
        log.error(
            "Unhandled Error",
            json!({
                "request_id": client.request_id,
                "error": message,
                "method": method.as_str(),
                "url": url,
                "ip": client.ip,
                "user_agent": client.user_agent,
            }),
        );
    }
    response
}
