//! Snapshot refresh coordination.
//!
//! # Responsibilities
//! - Hold the published snapshot behind an `ArcSwap`
//! - Decide whether the held snapshot is stale
//! - Build a replacement off to the side and publish it in one swap
//! - Collapse concurrent refreshes into one (try-acquire, never wait)
//! - Report every outcome through the `StatusReporter`
//!
//! # Refresh
//! ```text
//! try lock ──busy──▶ Skipped (no report)
//!    │
//! version() ──err──▶ Err (snapshot untouched, no report)
//!    │
//! same as held ────▶ hit report ─▶ Unchanged
//!    │
//! rebuild ──err────▶ failure report (logged) ─▶ Err
//!    │
//! swap + success report ─▶ Rebuilt
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::matching::MatcherFactory;
use crate::observability::metrics;
use crate::remote::pagination::fetch_all;
use crate::remote::RemoteSource;
use crate::sync::reporter::StatusReporter;
use crate::sync::snapshot::Snapshot;
use crate::sync::types::{AgentIdentity, RefreshOutcome, SyncError, SyncResult};

pub struct RefreshCoordinator<S> {
    source: Arc<S>,
    current: ArcSwap<Snapshot>,
    refreshing: AtomicBool,
    reporter: StatusReporter<S>,
    factory: MatcherFactory,
}

/// Releases the refresh lock on drop, on every exit path.
struct RefreshGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl<S: RemoteSource> RefreshCoordinator<S> {
    pub fn new(source: Arc<S>, identity: AgentIdentity, factory: MatcherFactory) -> Self {
        let reporter = StatusReporter::new(source.clone(), identity);
        Self {
            source,
            current: ArcSwap::from_pointee(Snapshot::empty(&factory)),
            refreshing: AtomicBool::new(false),
            reporter,
            factory,
        }
    }

    /// The currently published snapshot. Never blocks.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn version(&self) -> u64 {
        self.current.load().version()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<RefreshGuard<'_>> {
        self.refreshing
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| RefreshGuard {
                flag: &self.refreshing,
            })
    }

    /// Check the remote version and rebuild when it moved.
    ///
    /// Returns `Skipped` immediately when another refresh is running.
    pub async fn refresh(&self) -> SyncResult<RefreshOutcome> {
        let Some(_guard) = self.try_begin() else {
            tracing::trace!("Refresh already in flight, skipping");
            return record(Ok(RefreshOutcome::Skipped));
        };

        record(self.check_and_refresh().await)
    }

    /// Rebuild unconditionally. Fails with `Busy` if a refresh holds the lock.
    pub async fn force_refresh(&self) -> SyncResult<RefreshOutcome> {
        let Some(_guard) = self.try_begin() else {
            return record(Err(SyncError::Busy));
        };

        let result = match self.source.version().await {
            Ok(version) => self.rebuild_and_report(version).await,
            Err(e) => Err(e.into()),
        };
        record(result)
    }

    async fn check_and_refresh(&self) -> SyncResult<RefreshOutcome> {
        let version = self.source.version().await?;
        if version == self.version() {
            self.reporter.hit().await?;
            return Ok(RefreshOutcome::Unchanged { version });
        }

        tracing::info!(held = self.version(), remote = version, "Remote version changed, rebuilding");
        self.rebuild_and_report(version).await
    }

    async fn rebuild_and_report(&self, version: u64) -> SyncResult<RefreshOutcome> {
        let started = Instant::now();
        let result = self.rebuild().await;
        let elapsed = started.elapsed();
        metrics::record_rebuild_duration(elapsed);

        match result {
            Ok(snapshot) => {
                metrics::record_snapshot_version(snapshot.version());
                tracing::info!(
                    version = snapshot.version(),
                    redirects = snapshot.redirect_count(),
                    pages = snapshot.page_count(),
                    elapsed = ?elapsed,
                    "Snapshot published"
                );

                // the swap already happened; a failed report still fails the call
                let status = self.reporter.status(version, elapsed, None);
                self.reporter.report(&status).await?;
                Ok(RefreshOutcome::Rebuilt {
                    version: snapshot.version(),
                    elapsed,
                })
            }
            Err(e) => {
                tracing::warn!(
                    version,
                    held = self.version(),
                    error = %e,
                    "Rebuild failed, keeping current snapshot"
                );

                let status = self.reporter.status(version, elapsed, Some(&e.to_string()));
                if let Err(report_err) = self.reporter.report(&status).await {
                    tracing::warn!(error = %report_err, "Failed to report rebuild failure");
                }
                Err(e)
            }
        }
    }

    /// Fetch everything, populate fresh matchers and publish.
    async fn rebuild(&self) -> SyncResult<Arc<Snapshot>> {
        let version = self.source.version().await?;

        let redirects = fetch_all(|offset, limit| self.source.redirects(offset, limit)).await?;
        let mut redirect_matcher = self.factory.new_redirects();
        for redirect in redirects {
            redirect_matcher.insert(redirect)?;
        }

        let pages = fetch_all(|offset, limit| self.source.pages(offset, limit)).await?;
        let mut page_matcher = self.factory.new_pages();
        for page in pages {
            page_matcher.insert(page);
        }

        let snapshot = Arc::new(Snapshot::new(version, redirect_matcher, page_matcher));
        self.current.store(snapshot.clone());
        Ok(snapshot)
    }
}

/// Count one refresh attempt under its outcome. Contention is not a failure.
fn record(result: SyncResult<RefreshOutcome>) -> SyncResult<RefreshOutcome> {
    let outcome = match &result {
        Ok(RefreshOutcome::Skipped) | Err(SyncError::Busy) => "skipped",
        Ok(RefreshOutcome::Unchanged { .. }) => "unchanged",
        Ok(RefreshOutcome::Rebuilt { .. }) => "rebuilt",
        Err(_) => "failed",
    };
    metrics::record_refresh(outcome);
    result
}
