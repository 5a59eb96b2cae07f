//! Rule matching subsystem.
//!
//! # Data Flow
//! ```text
//! Rebuild (sync::coordinator):
//!     MatcherFactory → fresh RedirectMatcher / PageMatcher
//!     → insert every fetched rule
//!     → frozen inside a Snapshot
//!
//! Lookup (host process):
//!     (host, path) → Snapshot → matcher.find()
//!     → Return: matched rule or None
//! ```
//!
//! # Design Decisions
//! - Matchers are opaque to the sync core: only `insert` and `find`
//! - Populated once per rebuild, never mutated after publication
//! - `find` takes `&self` so any number of readers share a snapshot

pub mod table;
pub mod types;

use std::sync::Arc;

pub use table::{PageTable, RedirectTable};
pub use types::{Page, PageKind, Redirect, RedirectKind, RuleError};

/// Lookup structure for redirect rules.
pub trait RedirectMatcher: Send + Sync + std::fmt::Debug {
    /// Index a rule. Fails when the rule cannot be compiled.
    fn insert(&mut self, redirect: Redirect) -> Result<(), RuleError>;

    /// Resolve a request to a rule and the computed target location.
    fn find(&self, host: &str, path: &str) -> Option<(Arc<Redirect>, String)>;

    /// Number of indexed rules.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lookup structure for static pages. Insertion never fails.
pub trait PageMatcher: Send + Sync + std::fmt::Debug {
    fn insert(&mut self, page: Page);

    fn find(&self, host: &str, path: &str) -> Option<Arc<Page>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Constructors for the empty matchers a rebuild starts from.
#[derive(Clone, Copy)]
pub struct MatcherFactory {
    pub redirects: fn() -> Box<dyn RedirectMatcher>,
    pub pages: fn() -> Box<dyn PageMatcher>,
}

impl MatcherFactory {
    pub fn new_redirects(&self) -> Box<dyn RedirectMatcher> {
        (self.redirects)()
    }

    pub fn new_pages(&self) -> Box<dyn PageMatcher> {
        (self.pages)()
    }
}

fn redirect_table() -> Box<dyn RedirectMatcher> {
    Box::new(RedirectTable::new())
}

fn page_table() -> Box<dyn PageMatcher> {
    Box::new(PageTable::new())
}

impl Default for MatcherFactory {
    fn default() -> Self {
        Self {
            redirects: redirect_table,
            pages: page_table,
        }
    }
}

impl std::fmt::Debug for MatcherFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherFactory").finish_non_exhaustive()
    }
}
