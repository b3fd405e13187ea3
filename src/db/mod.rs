//! Data access layer.
//!
//! # Data Flow
//! ```text
//! route handler
//!     → Database::<operation>
//!     → execute(): deadline + pooled connection scoped to the call
//!     → one parameterized statement
//!     → LogService::log_database (info on success, error on failure)
//!     → Result back to the route, which owns the HTTP mapping
//! ```
//!
//! # Design Decisions
//! - Values are always bound, never spliced into SQL text
//! - The connection lives inside the call future; dropping the future on
//!   success, error or timeout returns it to the pool
//! - Failures are logged here and returned, never swallowed

pub mod comments;
pub mod models;
pub mod posts;
pub mod users;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::auth::PasswordError;
use crate::config::DatabaseConfig;
use crate::observability::{metrics, LogService};
use crate::resilience::timeouts::{with_deadline, DeadlineExceeded};

pub use models::{Comment, NewComment, NewPost, NewUser, Post, User, WriteResult};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("database call failed: {0}")]
    Deadline(#[from] DeadlineExceeded),
    #[error("password processing failed: {0}")]
    Password(#[from] PasswordError),
    #[error("background task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

/// Pooled access to the blog tables.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    log: LogService,
    statement_timeout: Duration,
}

impl Database {
    /// Open the pool described by `config`. The database file is created if missing.
    pub async fn connect(config: &DatabaseConfig, log: LogService) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .connect_with(options)
            .await;

        let pool = match pool {
            Ok(pool) => pool,
            Err(e) => {
                log.log_database("CONNECT", "-", json!({ "url": config.url }), Some(&e));
                return Err(e.into());
            }
        };

        log.info(
            "Database pool ready",
            json!({ "max_connections": config.max_connections }),
        );

        Ok(Self {
            pool,
            log,
            statement_timeout: Duration::from_millis(config.statement_timeout_ms),
        })
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), DbError> {
        match sqlx::migrate!("./migrations").run(&self.pool).await {
            Ok(()) => {
                self.log.info("Database migrations applied", json!({}));
                Ok(())
            }
            Err(e) => Err(self.fail("MIGRATE", "-", json!({}), e.into())),
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Run one statement under the per-call deadline and log its outcome.
    async fn execute<T, F>(
        &self,
        operation: &'static str,
        table: &'static str,
        details: Value,
        call: F,
    ) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let result = with_deadline(self.statement_timeout, async { call.await.map_err(DbError::from) }).await;

        match &result {
            Ok(_) => self.log.log_database(operation, table, details, None),
            Err(e) => self.log.log_database(operation, table, details, Some(e)),
        }
        metrics::record_db_operation(operation, table, result.is_ok());
        result
    }

    /// Run CPU-bound work on the blocking pool. A returned error and a
    /// failed join are both logged against `operation` and `table`.
    async fn blocking<T, E, F>(
        &self,
        operation: &'static str,
        table: &'static str,
        details: Value,
        work: F,
    ) -> Result<T, DbError>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<DbError> + Send + 'static,
    {
        match tokio::task::spawn_blocking(work).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.fail(operation, table, details, e.into())),
            Err(e) => Err(self.fail(operation, table, details, e.into())),
        }
    }

    /// Log a failure that happened outside `execute` and hand it back.
    fn fail(&self, operation: &'static str, table: &'static str, details: Value, err: DbError) -> DbError {
        self.log.log_database(operation, table, details, Some(&err));
        metrics::record_db_operation(operation, table, false);
        err
    }
}
