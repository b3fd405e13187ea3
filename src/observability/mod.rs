//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http middleware, routes, data access
//!     → logging.rs (LogService: leveled JSON records)
//!         → single writer thread
//!         → rotation.rs (error / combined / access daily files)
//!         → console mirror (non-production)
//!     → metrics.rs (counters, histograms)
//!
//! Process lifecycle, logger I/O failures
//!     → tracing.rs (operator diagnostics on stderr/stdout)
//!
//! view-logs CLI
//!     → viewer.rs (list and pretty-print files)
//! ```

pub mod logging;
pub mod metrics;
pub mod rotation;
pub mod tracing;
pub mod viewer;

pub use logging::{LogError, LogLevel, LogRecord, LogService};
pub use rotation::Category;
