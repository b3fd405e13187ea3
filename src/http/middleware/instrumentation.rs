//! Request instrumentation.
//!
//! # Data Flow
//! ```text
//! request → RequestContext::new (client meta, route template, tags)
//!         → on_request for each observer, first to last
//!         → inner service
//!         → RequestContext::complete (status, elapsed, content length)
//!         → on_response for each observer, last to first
//! ```
//!
//! # Design Decisions
//! - The order is an explicit list built at startup, not a side effect of
//!   registration order
//! - Installed with `Router::layer` so the matched route template is known
//! - Observers never change the response

use std::sync::Arc;

use axum::body::HttpBody;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::classify::RouteClassifier;
use super::observers::{
    AuthAttemptTagger, CrudTagger, RequestLogger, RequestObserver, SlowRequestDetector,
};
use crate::config::HttpConfig;
use crate::http::request::{Completion, RequestContext};
use crate::observability::LogService;

pub struct ObserverChain {
    log: LogService,
    classifier: RouteClassifier,
    observers: Vec<Box<dyn RequestObserver>>,
}

impl ObserverChain {
    pub fn new(log: LogService, classifier: RouteClassifier) -> Self {
        Self {
            log,
            classifier,
            observers: Vec::new(),
        }
    }

    /// The standard chain: request logger, slow-request detector,
    /// authentication tagger, CRUD tagger.
    pub fn standard(config: &HttpConfig, log: LogService, classifier: RouteClassifier) -> Self {
        Self::new(log, classifier)
            .with(RequestLogger)
            .with(SlowRequestDetector::new(config.slow_request_threshold_ms))
            .with(AuthAttemptTagger)
            .with(CrudTagger)
    }

    pub fn with(mut self, observer: impl RequestObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    pub fn request_started(&self, ctx: &RequestContext) {
        for observer in &self.observers {
            observer.on_request(ctx, &self.log);
        }
    }

    pub fn request_finished(&self, ctx: &RequestContext, done: &Completion) {
        for observer in self.observers.iter().rev() {
            observer.on_response(ctx, done, &self.log);
        }
    }
}

fn content_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .or_else(|| response.body().size_hint().exact())
}

/// Middleware driving an [`ObserverChain`] around the inner service.
pub async fn instrument(
    State(chain): State<Arc<ObserverChain>>,
    request: Request,
    next: Next,
) -> Response {
    let mut ctx = RequestContext::new(&request, chain.classifier());
    chain.request_started(&ctx);

    let response = next.run(request).await;

    let done = ctx.complete(response.status(), content_length(&response));
    chain.request_finished(&ctx, &done);
    response
}
