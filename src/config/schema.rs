//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::remote::AgentType;

/// Root configuration for the agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the manager (e.g., "https://manager.example.com").
    pub manager_url: String,

    /// Namespace owning the project.
    pub namespace: String,

    /// Project whose rules are synchronized.
    pub project: String,

    /// Identity and polling settings.
    pub agent: AgentSection,

    /// Manager HTTP client settings.
    pub http: HttpConfig,

    /// Host HTTP server settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl AgentConfig {
    pub fn api_url(&self) -> String {
        format!("{}/api", self.manager_url.trim_end_matches('/'))
    }

    pub fn project_url(&self) -> String {
        format!("{}/namespace/{}/project/{}", self.api_url(), self.namespace, self.project)
    }

    pub fn version_url(&self) -> String {
        format!("{}/version", self.project_url())
    }

    pub fn redirects_url(&self) -> String {
        format!("{}/redirects", self.project_url())
    }

    pub fn pages_url(&self) -> String {
        format!("{}/pages", self.project_url())
    }

    pub fn agents_url(&self) -> String {
        format!("{}/agents", self.project_url())
    }

    /// Hit endpoint for `name`, percent-encoded as a single path segment.
    pub fn agent_hit_url(&self, name: &str) -> String {
        let agents = self.agents_url();
        if let Ok(mut url) = Url::parse(&agents) {
            let pushed = url
                .path_segments_mut()
                .map(|mut segments| {
                    segments.push(name).push("hit");
                })
                .is_ok();
            if pushed {
                return url.into();
            }
        }
        format!("{}/{}/hit", agents, name)
    }
}

/// Agent identity and polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentSection {
    /// Name reported to the manager (default: $HOSTNAME).
    pub name: String,

    #[serde(rename = "type")]
    pub agent_type: AgentType,

    /// Seconds between version checks.
    pub interval_check_secs: u64,
}

fn default_agent_name() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "rule-agent".to_string())
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            agent_type: AgentType::Default,
            interval_check_secs: 300,
        }
    }
}

/// Manager HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Header carrying the bearer token.
    pub auth_header: String,

    /// Token sent as `Bearer <token>`.
    pub token: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            auth_header: "Authorization".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Host server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
