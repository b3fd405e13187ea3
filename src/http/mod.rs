//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer stack)
//!     → middleware/ (observer chain, error logger)
//!     → request.rs (client meta, per-request context)
//!     → routes/ (handlers, payload.rs for bodies)
//!     → response.rs (success envelope, error mapping)
//!     → Send to client
//! ```

pub mod middleware;
pub mod payload;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ClientMeta, RequestContext, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
