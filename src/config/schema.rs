//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the blog server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::observability::logging::LogLevel;

/// Root configuration for the blog server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BlogConfig {
    /// Deployment environment. Controls console mirroring and the default log level.
    pub environment: Environment,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Relational store settings.
    pub database: DatabaseConfig,

    /// Structured business log settings.
    pub logging: LoggingConfig,

    /// Request pipeline settings.
    pub http: HttpConfig,

    /// Operator diagnostics and metrics.
    pub observability: ObservabilityConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (e.g., "sqlite://blog.db").
    pub url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,

    /// How long to wait for a free connection, in milliseconds.
    pub acquire_timeout_ms: u64,

    /// Deadline for a single data access call, in milliseconds.
    pub statement_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://blog.db".to_string(),
            max_connections: 5,
            acquire_timeout_ms: 5_000,
            statement_timeout_ms: 5_000,
        }
    }
}

/// Business log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory holding the rotating log files.
    pub dir: String,

    /// Minimum level for the combined and access files.
    /// Defaults to `info` in production and `debug` otherwise.
    pub level: Option<LogLevel>,

    /// Value of the `service` field stamped on every record.
    pub service_name: String,

    /// Files older than this many days are deleted.
    pub retention_days: u32,

    /// A file reaching this size rolls over to a numbered segment.
    pub max_file_bytes: u64,

    /// Mirror records to the console. Defaults to on outside production.
    pub console: Option<bool>,

    /// Records queued for the writer thread before new ones are dropped.
    pub buffer_capacity: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            level: None,
            service_name: "gaming-blog".to_string(),
            retention_days: 14,
            max_file_bytes: 20 * 1024 * 1024, // 20MB
            console: None,
            buffer_capacity: 65_536,
        }
    }
}

impl LoggingConfig {
    pub fn effective_level(&self, environment: Environment) -> LogLevel {
        self.level.unwrap_or(if environment.is_production() {
            LogLevel::Info
        } else {
            LogLevel::Debug
        })
    }

    pub fn console_enabled(&self, environment: Environment) -> bool {
        self.console.unwrap_or(!environment.is_production())
    }
}

/// How the auth and CRUD taggers decide whether a request concerns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteClassification {
    /// Use the intent declared next to each registered route.
    #[default]
    Declared,
    /// Match marker substrings anywhere in the request path.
    PathSubstring,
}

/// Request pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Requests slower than this (milliseconds) produce a warning.
    pub slow_request_threshold_ms: u64,

    /// Auth/CRUD tagging strategy.
    pub route_classification: RouteClassification,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum body size in bytes.
    pub max_body_size: usize,

    /// Directory of static assets served for unclaimed paths.
    pub static_dir: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            slow_request_threshold_ms: 1_000,
            route_classification: RouteClassification::Declared,
            request_timeout_secs: 30,
            max_body_size: 2 * 1024 * 1024, // 2MB
            static_dir: Some("public".to_string()),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter for operator diagnostics (tracing), used when RUST_LOG is unset.
    pub tracing_filter: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            tracing_filter: "blog_server=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_follows_environment() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.effective_level(Environment::Production), LogLevel::Info);
        assert_eq!(logging.effective_level(Environment::Development), LogLevel::Debug);
        assert!(!logging.console_enabled(Environment::Production));
        assert!(logging.console_enabled(Environment::Development));

        let pinned = LoggingConfig {
            level: Some(LogLevel::Warn),
            console: Some(false),
            ..LoggingConfig::default()
        };
        assert_eq!(pinned.effective_level(Environment::Development), LogLevel::Warn);
        assert!(!pinned.console_enabled(Environment::Development));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BlogConfig = toml::from_str(
            r#"
            environment = "production"

            [http]
            slow_request_threshold_ms = 250
            route_classification = "path_substring"
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.http.slow_request_threshold_ms, 250);
        assert_eq!(config.http.route_classification, RouteClassification::PathSubstring);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.logging.retention_days, 14);
    }
}
