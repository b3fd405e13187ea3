//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Data access call:
//!     → timeouts.rs (enforce per-call deadline)
//!     → on timeout: error logged by the data layer, 500 to the client
//! ```
//!
//! # Design Decisions
//! - Every database call has a deadline
//! - No retries: writes are not idempotent and failures surface immediately

pub mod timeouts;
