//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Manager URL must be absolute and parseable
//! - Identity fields must be present (the manager keys agents by name)
//! - Validate value ranges (interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::AgentConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.manager_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "manager_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("manager_url", e.to_string())),
    }

    if config.namespace.trim().is_empty() {
        errors.push(ValidationError::new("namespace", "must not be empty"));
    }
    if config.project.trim().is_empty() {
        errors.push(ValidationError::new("project", "must not be empty"));
    }
    if config.agent.name.trim().is_empty() {
        errors.push(ValidationError::new("agent.name", "must not be empty"));
    }
    if config.agent.interval_check_secs == 0 {
        errors.push(ValidationError::new("agent.interval_check_secs", "must be greater than 0"));
    }
    if config.http.timeout_secs == 0 {
        errors.push(ValidationError::new("http.timeout_secs", "must be greater than 0"));
    }
    if config.http.auth_header.trim().is_empty() {
        errors.push(ValidationError::new("http.auth_header", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
