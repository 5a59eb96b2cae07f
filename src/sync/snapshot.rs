//! Immutable configuration snapshot.
//!
//! A snapshot bundles a version with the two matchers populated for that
//! version. It is built privately by the coordinator and only becomes
//! visible through an atomic swap, so readers see all of it or none of it.

use std::sync::Arc;

use crate::matching::{MatcherFactory, Page, PageMatcher, Redirect, RedirectMatcher};

#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    redirects: Box<dyn RedirectMatcher>,
    pages: Box<dyn PageMatcher>,
}

impl Snapshot {
    pub fn new(version: u64, redirects: Box<dyn RedirectMatcher>, pages: Box<dyn PageMatcher>) -> Self {
        Self {
            version,
            redirects,
            pages,
        }
    }

    /// Version 0 with no rules, held until the first rebuild.
    pub fn empty(factory: &MatcherFactory) -> Self {
        Self::new(0, factory.new_redirects(), factory.new_pages())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn match_redirect(&self, host: &str, path: &str) -> Option<(Arc<Redirect>, String)> {
        self.redirects.find(host, path)
    }

    pub fn match_page(&self, host: &str, path: &str) -> Option<Arc<Page>> {
        self.pages.find(host, path)
    }

    pub fn redirect_count(&self) -> usize {
        self.redirects.len()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
