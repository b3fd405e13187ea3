//! Gaming blog server library.

pub mod auth;
pub mod config;
pub mod db;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routes;

pub use config::BlogConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
