//! Refresh outcomes and error definitions.

use std::time::Duration;

use thiserror::Error;

use crate::matching::RuleError;
use crate::remote::{AgentType, RemoteError};

/// Name and type the agent reports under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub name: String,
    pub agent_type: AgentType,
}

impl AgentIdentity {
    pub fn new(name: impl Into<String>, agent_type: AgentType) -> Self {
        Self {
            name: name.into(),
            agent_type,
        }
    }
}

/// What a refresh call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh held the lock; nothing was done.
    Skipped,
    /// Remote version equals the held one; a hit was reported.
    Unchanged { version: u64 },
    /// A new snapshot was published.
    Rebuilt { version: u64, elapsed: Duration },
}

/// Errors surfaced by refresh and initialization.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport, protocol or reporting failure.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A rule could not be indexed; the rebuild was aborted.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Forced rebuild requested while another refresh was in flight.
    #[error("a refresh is already in progress")]
    Busy,
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
