//! Structured business logging.
//!
//! # Responsibilities
//! - Build leveled, timestamped JSON records
//! - Fan records out to the error / combined / access files
//! - Mirror records to a coloured console outside production
//! - Helpers for database, authentication and CRUD events
//!
//! # Design Decisions
//! - `LogService` is constructed once at startup and cloned into every
//!   subsystem that logs; there is no global logger
//! - A single writer thread owns every file handle, so each record is one
//!   uninterrupted line no matter how many requests log concurrently
//! - Logging never fails or blocks the caller: I/O problems are reported
//!   through `tracing`, and records arriving while the bounded queue is full
//!   are dropped and counted

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Local, SecondsFormat};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::config::{Environment, LoggingConfig};
use crate::observability::metrics;
use crate::observability::rotation::{self, Category, RollingFile};

/// Record severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    fn colorize(self, text: &str) -> ColoredString {
        match self {
            LogLevel::Debug => text.blue(),
            LogLevel::Info => text.green(),
            LogLevel::Warn => text.yellow(),
            LogLevel::Error => text.red(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

const RESERVED_KEYS: [&str; 3] = ["timestamp", "level", "message"];

/// One structured log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, false))
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>, metadata: Value) -> Self {
        let mut metadata = match metadata {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("meta".to_string(), other);
                map
            }
        };
        for key in RESERVED_KEYS {
            metadata.remove(key);
        }
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
            metadata,
        }
    }

    /// Serialize as a single newline-terminated JSON line.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Error type for opening the log service.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start log writer: {0}")]
    Spawn(#[source] std::io::Error),
}

enum Command {
    Write(LogRecord),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

struct Inner {
    tx: mpsc::Sender<Command>,
    dropped: AtomicU64,
    min_level: LogLevel,
    service: String,
    dir: PathBuf,
}

/// Handle to the process-wide structured logger.
///
/// Cheap to clone. Opened once in `main`, shut down after the server stops.
#[derive(Clone)]
pub struct LogService {
    inner: Arc<Inner>,
}

impl LogService {
    /// Create the log directory and start the writer thread.
    pub fn open(config: &LoggingConfig, environment: Environment) -> Result<Self, LogError> {
        let dir = PathBuf::from(&config.dir);
        rotation::ensure_dir(&dir).map_err(|source| LogError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let min_level = config.effective_level(environment);
        let destinations = Category::ALL
            .into_iter()
            .map(|category| Destination {
                min_level: match category {
                    Category::Error => LogLevel::Error,
                    Category::Combined | Category::Access => min_level,
                },
                file: RollingFile::new(&dir, category, config.max_file_bytes, config.retention_days),
            })
            .collect();

        let writer = Writer {
            destinations,
            console: config.console_enabled(environment),
        };

        let (tx, rx) = mpsc::channel(config.buffer_capacity.max(1));
        thread::Builder::new()
            .name("log-writer".to_string())
            .spawn(move || writer.run(rx))
            .map_err(LogError::Spawn)?;

        Ok(Self {
            inner: Arc::new(Inner {
                tx,
                dropped: AtomicU64::new(0),
                min_level,
                service: config.service_name.clone(),
                dir,
            }),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    pub fn min_level(&self) -> LogLevel {
        self.inner.min_level
    }

    /// Records discarded because the writer queue was full.
    pub fn dropped_records(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    /// Append a record to every destination that accepts `level`.
    pub fn log(&self, level: LogLevel, message: impl Into<String>, metadata: Value) {
        if level < self.inner.min_level {
            return;
        }
        let mut record = LogRecord::new(level, message, metadata);
        record
            .metadata
            .entry("service")
            .or_insert_with(|| Value::String(self.inner.service.clone()));

        match self.inner.tx.try_send(Command::Write(record)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = self.inner.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                metrics::record_dropped_log_record();
                if dropped.is_power_of_two() {
                    tracing::warn!(dropped, "Log writer queue full; record dropped");
                }
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Log writer stopped; record dropped");
            }
        }
    }

    pub fn debug(&self, message: impl Into<String>, metadata: Value) {
        self.log(LogLevel::Debug, message, metadata);
    }

    pub fn info(&self, message: impl Into<String>, metadata: Value) {
        self.log(LogLevel::Info, message, metadata);
    }

    pub fn warn(&self, message: impl Into<String>, metadata: Value) {
        self.log(LogLevel::Warn, message, metadata);
    }

    pub fn error(&self, message: impl Into<String>, metadata: Value) {
        self.log(LogLevel::Error, message, metadata);
    }

    /// Outcome of a data access call: `error` when `error` is set, else `info`.
    pub fn log_database(
        &self,
        operation: &str,
        table: &str,
        details: Value,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        match error {
            Some(err) => self.error(
                "Database Operation Error",
                json!({
                    "operation": operation,
                    "table": table,
                    "details": details,
                    "error": err.to_string(),
                    "cause_chain": cause_chain(err),
                }),
            ),
            None => self.info(
                "Database Operation",
                json!({
                    "operation": operation,
                    "table": table,
                    "details": details,
                }),
            ),
        }
    }

    /// Authentication outcome: `info` on success, `warn` on failure.
    pub fn log_auth(&self, action: &str, user_id: Option<i64>, details: Value, success: bool) {
        let ip = details
            .get("ip")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let metadata = json!({
            "action": action,
            "user_id": user_id,
            "details": details,
            "success": success,
            "ip": ip,
        });
        if success {
            self.info("Authentication Success", metadata);
        } else {
            self.warn("Authentication Failure", metadata);
        }
    }

    pub fn log_crud(
        &self,
        operation: &str,
        resource: &str,
        resource_id: Option<i64>,
        user_id: Option<i64>,
        details: Value,
    ) {
        self.info(
            "CRUD Operation",
            json!({
                "operation": operation,
                "resource": resource,
                "resource_id": resource_id,
                "user_id": user_id,
                "details": details,
            }),
        );
    }

    /// Wait until every record logged before this call has been written.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.inner.tx.send(Command::Flush(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Drain pending records and stop the writer thread.
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.inner.tx.send(Command::Shutdown(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }
}

fn cause_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

struct Destination {
    min_level: LogLevel,
    file: RollingFile,
}

struct Writer {
    destinations: Vec<Destination>,
    console: bool,
}

impl Writer {
    fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(command) = rx.blocking_recv() {
            match command {
                Command::Write(record) => self.write(&record),
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
                Command::Shutdown(ack) => {
                    // Records queued behind the shutdown request are still written.
                    rx.close();
                    while let Ok(pending) = rx.try_recv() {
                        match pending {
                            Command::Write(record) => self.write(&record),
                            Command::Flush(waiter) | Command::Shutdown(waiter) => {
                                let _ = waiter.send(());
                            }
                        }
                    }
                    let _ = ack.send(());
                    break;
                }
            }
        }
    }

    fn write(&mut self, record: &LogRecord) {
        let line = match record.to_line() {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, message = %record.message, "Failed to serialize log record");
                return;
            }
        };

        let day = record.timestamp.date_naive();
        for destination in &mut self.destinations {
            if record.level < destination.min_level {
                continue;
            }
            if let Err(e) = destination.file.append(day, line.as_bytes()) {
                tracing::error!(
                    category = %destination.file.category(),
                    error = %e,
                    "Failed to write log record"
                );
            }
        }

        if self.console {
            print_console(record);
        }
    }
}

fn print_console(record: &LogRecord) {
    let mut metadata = record.metadata.clone();
    metadata.remove("service");
    let meta = if metadata.is_empty() {
        String::new()
    } else {
        serde_json::to_string_pretty(&metadata).unwrap_or_default()
    };

    let mut out = std::io::stdout().lock();
    let _ = writeln!(
        out,
        "{} [{}]: {} {}",
        record.timestamp.format("%H:%M:%S"),
        record.level.colorize(record.level.as_str()),
        record.message,
        meta
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn quiet_config(dir: &Path) -> LoggingConfig {
        LoggingConfig {
            dir: dir.to_string_lossy().into_owned(),
            console: Some(false),
            ..LoggingConfig::default()
        }
    }

    fn read_category(dir: &Path, category: Category) -> Vec<Value> {
        let mut records = Vec::new();
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            if name.starts_with(&format!("{}-", category)) {
                for line in fs::read_to_string(&path).unwrap().lines() {
                    records.push(serde_json::from_str(line).unwrap());
                }
            }
        }
        records
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_record_is_one_json_line() {
        let record = LogRecord::new(
            LogLevel::Info,
            "hello",
            json!({"timestamp": "spoofed", "message": "spoofed", "user": "bob\nsmith"}),
        );
        let line = record.to_line().unwrap();
        assert_eq!(line.matches('\n').count(), 1);

        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["message"], "hello");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["user"], "bob\nsmith");
        assert_ne!(parsed["timestamp"], "spoofed");
    }

    #[test]
    fn test_non_object_metadata_is_wrapped() {
        let record = LogRecord::new(LogLevel::Debug, "m", json!(42));
        assert_eq!(record.metadata["meta"], 42);
    }

    #[tokio::test]
    async fn test_error_records_duplicated_into_error_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogService::open(&quiet_config(dir.path()), Environment::Development).unwrap();

        log.info("routine", json!({}));
        log.error("broken", json!({"code": 7}));
        log.flush().await;

        let combined = read_category(dir.path(), Category::Combined);
        let access = read_category(dir.path(), Category::Access);
        let errors = read_category(dir.path(), Category::Error);

        assert_eq!(combined.len(), 2);
        assert_eq!(access.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["message"], "broken");
        assert_eq!(errors[0]["code"], 7);
        assert_eq!(errors[0]["service"], "gaming-blog");
    }

    #[tokio::test]
    async fn test_production_drops_debug() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogService::open(&quiet_config(dir.path()), Environment::Production).unwrap();

        log.debug("noise", json!({}));
        log.info("signal", json!({}));
        log.flush().await;

        let combined = read_category(dir.path(), Category::Combined);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0]["message"], "signal");
    }

    #[tokio::test]
    async fn test_helper_levels() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogService::open(&quiet_config(dir.path()), Environment::Development).unwrap();

        let failure = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        log.log_database("SELECT", "Posts", json!({"id": 1}), None);
        log.log_database("INSERT", "Posts", json!({}), Some(&failure));
        log.log_auth("login", None, json!({"ip": "10.0.0.1"}), false);
        log.log_auth("login", Some(3), json!({}), true);
        log.log_crud("create", "post", Some(9), Some(3), json!({}));
        log.flush().await;

        let combined = read_category(dir.path(), Category::Combined);
        let summary: Vec<(String, String)> = combined
            .iter()
            .map(|r| {
                (
                    r["level"].as_str().unwrap().to_string(),
                    r["message"].as_str().unwrap().to_string(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("info".into(), "Database Operation".into()),
                ("error".into(), "Database Operation Error".into()),
                ("warn".into(), "Authentication Failure".into()),
                ("info".into(), "Authentication Success".into()),
                ("info".into(), "CRUD Operation".into()),
            ]
        );
        assert_eq!(combined[1]["error"], "disk on fire");
        assert_eq!(combined[2]["ip"], "10.0.0.1");
        assert_eq!(combined[3]["ip"], "unknown");
        assert_eq!(combined[4]["resource_id"], 9);
    }

    #[tokio::test]
    async fn test_concurrent_writes_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogService::open(&quiet_config(dir.path()), Environment::Development).unwrap();

        let mut tasks = Vec::new();
        for task in 0..8 {
            let log = log.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..50 {
                    log.info("burst", json!({"task": task, "i": i, "pad": "x".repeat(512)}));
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        log.flush().await;

        let combined = read_category(dir.path(), Category::Combined);
        assert_eq!(combined.len(), 400);
    }

    #[tokio::test]
    async fn test_full_queue_drops_and_counts() {
        let (tx, mut rx) = mpsc::channel(1);
        let log = LogService {
            inner: Arc::new(Inner {
                tx,
                dropped: AtomicU64::new(0),
                min_level: LogLevel::Debug,
                service: "gaming-blog".to_string(),
                dir: PathBuf::from("unused"),
            }),
        };

        log.info("first", json!({}));
        log.info("second", json!({}));
        log.warn("third", json!({}));
        assert_eq!(log.dropped_records(), 2);

        match rx.try_recv() {
            Ok(Command::Write(record)) => assert_eq!(record.message, "first"),
            _ => panic!("expected the first record to be queued"),
        }
        assert!(rx.try_recv().is_err());

        log.info("fourth", json!({}));
        assert_eq!(log.dropped_records(), 2);
    }

    #[tokio::test]
    async fn test_logging_after_shutdown_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let log = LogService::open(&quiet_config(dir.path()), Environment::Development).unwrap();

        log.info("before", json!({}));
        log.shutdown().await;
        log.info("after", json!({}));
        log.flush().await;

        let combined = read_category(dir.path(), Category::Combined);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0]["message"], "before");
    }
}
