//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the blog routes and static assets
//! - Wire up middleware (request id, tracing, observers, timeout, panics)
//! - Bind server to listener and stop on shutdown
//!
//! # Layer order (outermost first)
//! ```text
//! SetRequestId → PropagateRequestId → Trace → instrument (observer chain)
//!     → Timeout → error_logger → CatchPanic → body limit → route
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::BlogConfig;
use crate::db::Database;
use crate::http::middleware::{
    error_logger, instrument, panic_response, ObserverChain, RouteClassifier,
};
use crate::http::response::ApiError;
use crate::observability::LogService;
use crate::routes;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub log: LogService,
}

/// HTTP server for the blog.
pub struct HttpServer {
    router: Router,
    config: BlogConfig,
}

impl HttpServer {
    pub fn new(config: BlogConfig, db: Database, log: LogService) -> Self {
        let state = AppState { db, log };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BlogConfig, state: AppState) -> Router {
        let classifier = RouteClassifier::new(config.http.route_classification, routes::declared_tags);
        let chain = Arc::new(ObserverChain::standard(&config.http, state.log.clone(), classifier));
        let log = state.log.clone();

        let app = routes::router();
        let app = match config.http.static_dir.as_deref().filter(|dir| Path::new(dir).is_dir()) {
            Some(dir) => app.fallback_service(ServeDir::new(dir).not_found_service(not_found.into_service())),
            None => app.fallback(not_found),
        };

        app.with_state(state)
            .layer(DefaultBodyLimit::max(config.http.max_body_size))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn_with_state(log, error_logger))
            .layer(request_timeout(config))
            .layer(middleware::from_fn_with_state(chain, instrument))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = ?self.config.environment,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }
}

/// Requests still running after `http.request_timeout_secs` get a 408.
fn request_timeout(config: &BlogConfig) -> TimeoutLayer {
    TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.http.request_timeout_secs),
    )
}

async fn not_found() -> impl IntoResponse {
    ApiError::NotFound("Not found")
}

/// Wait for Ctrl+C or an internal shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                // Fall back to the internal trigger only.
                let _ = shutdown.recv().await;
            }
        }
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}
