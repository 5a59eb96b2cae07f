//! Refresh outcome reporting.
//!
//! # Responsibilities
//! - Full status record after every rebuild (success or failure)
//! - Lightweight hit when the version did not change
//! - Reject records with an empty agent name before any request

use std::sync::Arc;
use std::time::Duration;

use crate::remote::{AgentOutcome, AgentStatus, RemoteError, RemoteResult, RemoteSource};
use crate::sync::types::AgentIdentity;

pub struct StatusReporter<S> {
    source: Arc<S>,
    identity: AgentIdentity,
}

impl<S: RemoteSource> StatusReporter<S> {
    pub fn new(source: Arc<S>, identity: AgentIdentity) -> Self {
        Self { source, identity }
    }

    /// Record for a rebuild of `version` that took `elapsed`.
    pub fn status(&self, version: u64, elapsed: Duration, error: Option<&str>) -> AgentStatus {
        AgentStatus {
            name: self.identity.name.clone(),
            agent_type: self.identity.agent_type,
            status: if error.is_some() {
                AgentOutcome::Error
            } else {
                AgentOutcome::Success
            },
            version,
            error: error.unwrap_or_default().to_string(),
            load_duration: elapsed,
        }
    }

    pub async fn report(&self, status: &AgentStatus) -> RemoteResult<()> {
        status.validate()?;
        self.source.post_status(status).await
    }

    pub async fn hit(&self) -> RemoteResult<()> {
        if self.identity.name.trim().is_empty() {
            return Err(RemoteError::Validation("agent name must not be empty".to_string()));
        }
        self.source.post_hit(&self.identity.name).await
    }
}
