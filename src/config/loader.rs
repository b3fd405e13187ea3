//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{BlogConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid environment override: {0}")]
    Override(String),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply process environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<BlogConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => BlogConfig::default(),
    };

    let config = apply_overrides(config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `BLOG_*` overrides using the given variable lookup.
pub fn apply_overrides<F>(mut config: BlogConfig, lookup: F) -> Result<BlogConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(env) = lookup("BLOG_ENV") {
        config.environment = env.parse::<Environment>().map_err(ConfigError::Override)?;
    }
    if let Some(addr) = lookup("BLOG_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(url) = lookup("BLOG_DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(dir) = lookup("BLOG_LOG_DIR") {
        config.logging.dir = dir;
    }
    Ok(config)
}
