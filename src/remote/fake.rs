//! Scripted in-memory `RemoteSource` for unit tests.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::matching::{Page, Redirect};
use crate::remote::types::{AgentStatus, Listing, RemoteError, RemoteResult};
use crate::remote::RemoteSource;

fn unavailable(what: &str) -> RemoteError {
    RemoteError::UnexpectedStatus {
        url: format!("fake://{}", what),
        status: 503,
        body: format!("{} error", what),
    }
}

fn page_of<T: Clone>(items: &[T], offset: usize, limit: usize) -> Listing<T> {
    let start = offset.min(items.len());
    let end = (offset + limit).min(items.len());
    Listing {
        items: items[start..end].to_vec(),
        total: items.len(),
    }
}

/// Serves whatever the test put in it and records every call.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub version: AtomicU64,
    pub redirect_rules: Mutex<Vec<Redirect>>,
    pub page_rules: Mutex<Vec<Page>>,

    /// Delay applied to `version()`, to hold the refresh lock.
    pub version_delay: Mutex<Option<Duration>>,
    pub fail_version: AtomicBool,
    pub fail_redirects: AtomicBool,
    pub fail_pages: AtomicBool,
    pub fail_reports: AtomicBool,

    pub version_calls: AtomicUsize,
    pub redirect_offsets: Mutex<Vec<usize>>,
    pub page_offsets: Mutex<Vec<usize>>,
    pub statuses: Mutex<Vec<AgentStatus>>,
    pub hits: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new(version: u64) -> Self {
        let source = Self::default();
        source.version.store(version, Ordering::SeqCst);
        source
    }

    pub fn with_rules(version: u64, redirects: Vec<Redirect>, pages: Vec<Page>) -> Self {
        let source = Self::new(version);
        *source.redirect_rules.lock().unwrap() = redirects;
        *source.page_rules.lock().unwrap() = pages;
        source
    }

    pub fn set_version(&self, version: u64) {
        self.version.store(version, Ordering::SeqCst);
    }

    pub fn statuses(&self) -> Vec<AgentStatus> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    /// Number of paginated requests for either collection.
    pub fn fetch_calls(&self) -> usize {
        self.redirect_offsets.lock().unwrap().len() + self.page_offsets.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteSource for FakeSource {
    async fn version(&self) -> RemoteResult<u64> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.version_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_version.load(Ordering::SeqCst) {
            return Err(unavailable("version"));
        }
        Ok(self.version.load(Ordering::SeqCst))
    }

    async fn redirects(&self, offset: usize, limit: usize) -> RemoteResult<Listing<Redirect>> {
        self.redirect_offsets.lock().unwrap().push(offset);
        if self.fail_redirects.load(Ordering::SeqCst) {
            return Err(unavailable("redirects"));
        }
        Ok(page_of(&self.redirect_rules.lock().unwrap(), offset, limit))
    }

    async fn pages(&self, offset: usize, limit: usize) -> RemoteResult<Listing<Page>> {
        self.page_offsets.lock().unwrap().push(offset);
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(unavailable("pages"));
        }
        Ok(page_of(&self.page_rules.lock().unwrap(), offset, limit))
    }

    async fn post_status(&self, status: &AgentStatus) -> RemoteResult<()> {
        self.statuses.lock().unwrap().push(status.clone());
        if self.fail_reports.load(Ordering::SeqCst) {
            return Err(unavailable("agents"));
        }
        Ok(())
    }

    async fn post_hit(&self, name: &str) -> RemoteResult<()> {
        self.hits.lock().unwrap().push(name.to_string());
        if self.fail_reports.load(Ordering::SeqCst) {
            return Err(unavailable("hit"));
        }
        Ok(())
    }
}
