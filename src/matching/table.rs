//! Default matcher backing store.
//!
//! # Responsibilities
//! - Exact rules: O(1) lookup keyed by (host, path)
//! - Pattern rules: anchored regexes tried in insertion order
//! - Expand capture groups into the redirect target
//!
//! # Design Decisions
//! - Host-bound rules win over any-host rules, exact rules win over patterns
//! - Hosts compared case-insensitively, request `:port` ignored
//! - Paths are case-sensitive
//! - First rule inserted for a key wins

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::matching::types::{Page, PageKind, Redirect, RuleError};
use crate::matching::{PageMatcher, RedirectMatcher};

/// Key of an exact rule. `None` host matches any host.
type ExactKey = (Option<String>, String);

/// Strip an optional port and lowercase the host.
pub fn normalize_host(host: &str) -> String {
    let host = match host.rsplit_once(':') {
        // keep bracketed IPv6 literals intact
        Some((name, port)) if !name.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    host.to_ascii_lowercase()
}

/// Split a `host/path` source into its parts.
fn split_host_path(source: &str) -> Result<(String, String), RuleError> {
    match source.find('/') {
        Some(idx) if idx > 0 => Ok((normalize_host(&source[..idx]), source[idx..].to_string())),
        _ => Err(RuleError::MissingHost(source.to_string())),
    }
}

fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| RuleError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug)]
struct PatternRule {
    regex: Regex,
    host_bound: bool,
    redirect: Arc<Redirect>,
}

/// Redirect rules indexed by host and path.
#[derive(Debug, Default)]
pub struct RedirectTable {
    exact: HashMap<ExactKey, Arc<Redirect>>,
    patterns: Vec<PatternRule>,
}

impl RedirectTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RedirectMatcher for RedirectTable {
    fn insert(&mut self, redirect: Redirect) -> Result<(), RuleError> {
        if redirect.kind.is_pattern() {
            let regex = compile(&redirect.source)?;
            self.patterns.push(PatternRule {
                regex,
                host_bound: redirect.kind.is_host_bound(),
                redirect: Arc::new(redirect),
            });
            return Ok(());
        }

        let key = if redirect.kind.is_host_bound() {
            let (host, path) = split_host_path(&redirect.source)?;
            (Some(host), path)
        } else {
            (None, redirect.source.clone())
        };
        self.exact.entry(key).or_insert_with(|| Arc::new(redirect));
        Ok(())
    }

    fn find(&self, host: &str, path: &str) -> Option<(Arc<Redirect>, String)> {
        let host = normalize_host(host);

        let exact = self
            .exact
            .get(&(Some(host.clone()), path.to_string()))
            .or_else(|| self.exact.get(&(None, path.to_string())));
        if let Some(redirect) = exact {
            return Some((redirect.clone(), redirect.target.clone()));
        }

        let host_path = format!("{}{}", host, path);
        self.patterns.iter().find_map(|rule| {
            let subject = if rule.host_bound { host_path.as_str() } else { path };
            let captures = rule.regex.captures(subject)?;
            let mut target = String::new();
            captures.expand(&rule.redirect.target, &mut target);
            Some((rule.redirect.clone(), target))
        })
    }

    fn len(&self) -> usize {
        self.exact.len() + self.patterns.len()
    }
}

/// Static pages indexed by host and path.
#[derive(Debug, Default)]
pub struct PageTable {
    pages: HashMap<ExactKey, Arc<Page>>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageMatcher for PageTable {
    fn insert(&mut self, page: Page) {
        let key = match page.kind {
            PageKind::Basic => (None, page.path.clone()),
            PageKind::BasicHost => match split_host_path(&page.path) {
                Ok((host, path)) => (Some(host), path),
                // a host-bound page without a host still serves on its path
                Err(_) => (None, page.path.clone()),
            },
        };
        self.pages.entry(key).or_insert_with(|| Arc::new(page));
    }

    fn find(&self, host: &str, path: &str) -> Option<Arc<Page>> {
        let host = normalize_host(host);
        self.pages
            .get(&(Some(host), path.to_string()))
            .or_else(|| self.pages.get(&(None, path.to_string())))
            .cloned()
    }

    fn len(&self) -> usize {
        self.pages.len()
    }
}
