//! Request pipeline middleware.

pub mod classify;
pub mod error_log;
pub mod instrumentation;
pub mod observers;

pub use classify::{RouteClassifier, RouteTags};
pub use error_log::{error_logger, panic_response};
pub use instrumentation::{instrument, ObserverChain};
