//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → tracing → LogService → metrics → Database + migrations
//!     → bind listener (startup.rs; releases pool and logs on failure) → serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger → stop accepting → drain in-flight requests
//!     → close pool → drain log writer → exit
//! ```

pub mod shutdown;
pub mod startup;

pub use shutdown::{release, Shutdown};
pub use startup::bind_listener;
