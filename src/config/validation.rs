//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, sizes > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BlogConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BlogConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub fn validate_config(config: &BlogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.database.url.trim().is_empty() {
        errors.push(ValidationError::new("database.url", "must not be empty"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be at least 1"));
    }
    if config.database.acquire_timeout_ms == 0 {
        errors.push(ValidationError::new("database.acquire_timeout_ms", "must be greater than 0"));
    }
    if config.database.statement_timeout_ms == 0 {
        errors.push(ValidationError::new("database.statement_timeout_ms", "must be greater than 0"));
    }

    if config.logging.dir.trim().is_empty() {
        errors.push(ValidationError::new("logging.dir", "must not be empty"));
    }
    if config.logging.retention_days == 0 {
        errors.push(ValidationError::new("logging.retention_days", "must be at least 1"));
    }
    if config.logging.max_file_bytes == 0 {
        errors.push(ValidationError::new("logging.max_file_bytes", "must be greater than 0"));
    }
    if config.logging.buffer_capacity == 0 {
        errors.push(ValidationError::new("logging.buffer_capacity", "must be at least 1"));
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::new("http.request_timeout_secs", "must be greater than 0"));
    }
    if config.http.max_body_size == 0 {
        errors.push(ValidationError::new("http.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
