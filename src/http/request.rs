//! Request metadata and the per-request observation context.
//!
//! # Responsibilities
//! - Read correlation id, client address and user agent from a request
//! - Hold the state observers see at request entry and completion
//!
//! # Design Decisions
//! - The request id comes from `x-request-id`, set by the outer request-id
//!   layer; a fresh UUID is generated when it is absent
//! - The client address is the peer socket address (no proxy headers trusted)

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts, MatchedPath, Request};
use axum::http::request::Parts;
use axum::http::{header, Extensions, HeaderMap, Method, StatusCode};
use uuid::Uuid;

use crate::http::middleware::classify::{RouteClassifier, RouteTags};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Who sent a request. Also usable as a handler extractor.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub request_id: String,
    pub ip: String,
    pub user_agent: String,
}

impl ClientMeta {
    fn read(headers: &HeaderMap, extensions: &Extensions) -> Self {
        let request_id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let ip = extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        Self {
            request_id,
            ip,
            user_agent,
        }
    }

    pub fn from_request(request: &Request) -> Self {
        Self::read(request.headers(), request.extensions())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::read(&parts.headers, &parts.extensions))
    }
}

/// Final outcome of a request, fixed once the response is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub status: StatusCode,
    pub elapsed: Duration,
    pub content_length: Option<u64>,
}

impl Completion {
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Everything the observer chain knows about one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub client: ClientMeta,
    pub method: Method,
    /// Path and query as received.
    pub url: String,
    pub path: String,
    /// Template of the route that claimed the request, if any.
    pub route: Option<String>,
    pub tags: RouteTags,
    pub started_at: Instant,
    completion: Option<Completion>,
}

impl RequestContext {
    pub fn new(request: &Request, classifier: &RouteClassifier) -> Self {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let url = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| path.clone());
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(|m| m.as_str().to_string());
        let tags = classifier.classify(&method, &path, route.as_deref());

        Self {
            client: ClientMeta::from_request(request),
            method,
            url,
            path,
            route,
            tags,
            started_at: Instant::now(),
            completion: None,
        }
    }

    /// Record the response outcome. Later calls keep the first outcome.
    pub fn complete(&mut self, status: StatusCode, content_length: Option<u64>) -> Completion {
        *self.completion.get_or_insert(Completion {
            status,
            elapsed: self.started_at.elapsed(),
            content_length,
        })
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }
}
