//! Response shapes and error mapping.
//!
//! # Responsibilities
//! - Wrap successful mutations as `{ "message", "result" }`
//! - Map handler failures to a status code and `{ "error" }` body
//!
//! # Design Decisions
//! - Internal failures expose only a fixed public message; the cause was
//!   already logged by the data access layer
//! - HTML is served only when the client asks for it in `Accept`

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;

/// Success envelope for create, update and delete.
#[derive(Debug, Serialize)]
pub struct ApiMessage<T> {
    pub message: &'static str,
    pub result: T,
}

pub fn respond<T: Serialize>(status: StatusCode, message: &'static str, result: T) -> Response {
    (status, Json(ApiMessage { message, result })).into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    /// A body the extractor refused, with the status axum chose for it.
    #[error("{1}")]
    Rejected(StatusCode, String),

    #[error("{public}")]
    Internal {
        public: &'static str,
        #[source]
        source: DbError,
    },
}

impl ApiError {
    /// Adapter for `map_err` that attaches a public message to a store failure.
    pub fn internal(public: &'static str) -> impl FnOnce(DbError) -> ApiError {
        move |source| ApiError::Internal { public, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Rejected(status, _) => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { source, .. } = &self {
            tracing::debug!(error = %source, "Request failed in data access layer");
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// True when the `Accept` header lists `text/html`.
pub fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
