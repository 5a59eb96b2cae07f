//! Remote source subsystem.
//!
//! # Data Flow
//! ```text
//! RefreshCoordinator
//!     → RemoteSource::version()            GET   /version
//!     → pagination::fetch_all()
//!         → RemoteSource::redirects()      GET   /redirects?limit&offset
//!         → RemoteSource::pages()          GET   /pages?limit&offset
//!     → StatusReporter
//!         → RemoteSource::post_status()    POST  /agents
//!         → RemoteSource::post_hit()       PATCH /agents/{name}/hit
//! ```
//!
//! # Design Decisions
//! - Sources are stateless I/O; no caching, no retries
//! - Timeouts belong to the concrete source (reqwest client in `http`)
//! - Non-200 responses are errors just like transport failures

#[cfg(test)]
pub mod fake;
pub mod http;
pub mod pagination;
pub mod types;

use async_trait::async_trait;

use crate::matching::{Page, Redirect};

pub use http::HttpSource;
pub use types::{AgentOutcome, AgentStatus, AgentType, Listing, RemoteError, RemoteResult};

/// Operations the sync core needs from the manager.
#[async_trait]
pub trait RemoteSource: Send + Sync + 'static {
    /// Current configuration generation.
    async fn version(&self) -> RemoteResult<u64>;

    /// One page of redirect rules.
    async fn redirects(&self, offset: usize, limit: usize) -> RemoteResult<Listing<Redirect>>;

    /// One page of static pages.
    async fn pages(&self, offset: usize, limit: usize) -> RemoteResult<Listing<Page>>;

    /// Full status record after a rebuild.
    async fn post_status(&self, status: &AgentStatus) -> RemoteResult<()>;

    /// Lightweight liveness notification when nothing changed.
    async fn post_hit(&self, name: &str) -> RemoteResult<()>;
}
