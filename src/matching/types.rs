//! Rule models served by the agent and the errors raised while indexing them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a redirect's `source` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectKind {
    /// Exact path, any host.
    #[default]
    Basic,
    /// Exact `host/path`.
    BasicHost,
    /// Pattern over the path.
    Regex,
    /// Pattern over `host/path`.
    RegexHost,
}

impl RedirectKind {
    /// True when the source names a host.
    pub fn is_host_bound(self) -> bool {
        matches!(self, RedirectKind::BasicHost | RedirectKind::RegexHost)
    }

    /// True when the source is a regular expression.
    pub fn is_pattern(self) -> bool {
        matches!(self, RedirectKind::Regex | RedirectKind::RegexHost)
    }
}

/// A redirect rule as published by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Redirect {
    #[serde(rename = "type", default)]
    pub kind: RedirectKind,

    /// Path, `host/path`, or pattern depending on `kind`.
    pub source: String,

    /// Location sent to the client. Pattern rules may reference capture groups.
    pub target: String,

    /// HTTP status code used when serving the redirect.
    #[serde(default = "default_redirect_status")]
    pub status: u16,
}

fn default_redirect_status() -> u16 {
    301
}

impl Redirect {
    /// Permanent redirect on an exact path.
    pub fn basic(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: RedirectKind::Basic,
            source: source.into(),
            target: target.into(),
            status: default_redirect_status(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Exact path, any host.
    #[default]
    Basic,
    /// Exact `host/path`.
    BasicHost,
}

/// A static page (robots.txt, sitemap, verification files...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Page {
    #[serde(rename = "type", default)]
    pub kind: PageKind,

    pub path: String,

    #[serde(default)]
    pub content: String,

    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_content_type() -> String {
    "text/plain".to_string()
}

impl Page {
    /// Plain text page on an exact path.
    pub fn basic(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: PageKind::Basic,
            path: path.into(),
            content: content.into(),
            content_type: default_content_type(),
        }
    }
}

/// Errors raised while inserting a rule into a matcher.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule's pattern does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A host-bound rule without a `host/path` shape.
    #[error("rule source '{0}' does not name a host")]
    MissingHost(String),
}
