//! Wire types exchanged with the manager and remote error definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// One page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Listing<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    /// Item count across all pages.
    #[serde(default)]
    pub total: usize,
}

/// Kind of host process the agent is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    #[default]
    Default,
}

/// Result of a rebuild as reported to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentOutcome {
    Success,
    Error,
}

/// Status record posted after every rebuild. Not retained locally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStatus {
    pub name: String,

    #[serde(rename = "type")]
    pub agent_type: AgentType,

    pub status: AgentOutcome,

    /// Version observed when the refresh started.
    pub version: u64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,

    #[serde(serialize_with = "serialize_duration")]
    pub load_duration: Duration,
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:?}", duration))
}

impl AgentStatus {
    /// Reject records the manager could not attribute to an agent.
    pub fn validate(&self) -> Result<(), RemoteError> {
        if self.name.trim().is_empty() {
            return Err(RemoteError::Validation("agent name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Errors raised by a remote source.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection, TLS, timeout or request building failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The manager answered with something other than 200.
    #[error("unexpected status code for {url}: {status} {body}")]
    UnexpectedStatus { url: String, status: u16, body: String },

    /// The response body could not be decoded.
    #[error("malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The version endpoint returned something other than an integer.
    #[error("invalid version '{0}'")]
    InvalidVersion(String),

    /// Rejected locally before any request was sent.
    #[error("invalid agent status: {0}")]
    Validation(String),
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;
