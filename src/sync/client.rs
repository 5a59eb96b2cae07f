//! Host-facing agent API.
//!
//! `SyncClient` is what the host process embeds: one synchronous
//! `initialize`, lock-free lookups on the hot path, manual `refresh`, and a
//! poll loop to run on a background task.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AgentConfig;
use crate::lifecycle::ShutdownSignal;
use crate::matching::{MatcherFactory, Page, Redirect};
use crate::remote::{HttpSource, RemoteError, RemoteSource};
use crate::sync::coordinator::RefreshCoordinator;
use crate::sync::poller;
use crate::sync::snapshot::Snapshot;
use crate::sync::types::{AgentIdentity, RefreshOutcome, SyncResult};

pub struct SyncClient<S> {
    coordinator: RefreshCoordinator<S>,
    poll_interval: Duration,
}

impl SyncClient<HttpSource> {
    /// Client talking to the manager described by `config`.
    pub fn from_config(config: &AgentConfig) -> Result<Self, RemoteError> {
        let identity = AgentIdentity::new(config.agent.name.clone(), config.agent.agent_type);
        let source = HttpSource::new(config.clone())?;
        Ok(Self::new(
            source,
            identity,
            Duration::from_secs(config.agent.interval_check_secs),
        ))
    }
}

impl<S: RemoteSource> SyncClient<S> {
    pub fn new(source: S, identity: AgentIdentity, poll_interval: Duration) -> Self {
        Self::with_matchers(source, identity, poll_interval, MatcherFactory::default())
    }

    /// Use custom matcher implementations for every snapshot.
    pub fn with_matchers(source: S, identity: AgentIdentity, poll_interval: Duration, factory: MatcherFactory) -> Self {
        Self {
            coordinator: RefreshCoordinator::new(Arc::new(source), identity, factory),
            poll_interval,
        }
    }

    /// Perform one full rebuild. The client is not ready until this succeeds.
    pub async fn initialize(&self) -> SyncResult<RefreshOutcome> {
        self.coordinator.force_refresh().await
    }

    /// Manual trigger; a no-op when a refresh is already running.
    pub async fn refresh(&self) -> SyncResult<RefreshOutcome> {
        self.coordinator.refresh().await
    }

    /// Poll until `shutdown` fires. Run it on a dedicated task.
    pub async fn start_polling(&self, shutdown: ShutdownSignal) {
        poller::poll(&self.coordinator, self.poll_interval, shutdown).await
    }

    pub fn current_version(&self) -> u64 {
        self.coordinator.version()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.coordinator.snapshot()
    }

    pub fn match_redirect(&self, host: &str, path: &str) -> Option<(Arc<Redirect>, String)> {
        self.coordinator.snapshot().match_redirect(host, path)
    }

    pub fn match_page(&self, host: &str, path: &str) -> Option<Arc<Page>> {
        self.coordinator.snapshot().match_page(host, path)
    }

    pub fn is_refreshing(&self) -> bool {
        self.coordinator.is_refreshing()
    }

    pub fn source(&self) -> &S {
        self.coordinator.source()
    }
}
