//! Manager API client over HTTP.
//!
//! # Responsibilities
//! - Build authenticated requests (`<auth_header>: Bearer <token>`)
//! - Map non-200 answers and undecodable bodies to `RemoteError`
//! - Enforce the per-request timeout

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::AgentConfig;
use crate::matching::{Page, Redirect};
use crate::remote::types::{AgentStatus, Listing, RemoteError, RemoteResult};
use crate::remote::RemoteSource;

/// `RemoteSource` backed by the manager's REST API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    config: AgentConfig,
}

impl HttpSource {
    /// Create a source with its own connection pool.
    pub fn new(config: AgentConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .map_err(|source| RemoteError::Transport {
                url: config.manager_url.clone(),
                source,
            })?;
        Ok(Self::with_client(client, config))
    }

    /// Create a source sharing an existing reqwest client.
    pub fn with_client(client: Client, config: AgentConfig) -> Self {
        Self { client, config }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(self.config.http.auth_header.as_str(), format!("Bearer {}", self.config.http.token))
    }

    /// Send and require a 200 answer.
    async fn send(&self, builder: RequestBuilder, url: &str) -> RemoteResult<Response> {
        let response = builder.send().await.map_err(|source| RemoteError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn read_body(response: Response, url: &str) -> RemoteResult<String> {
        response.text().await.map_err(|source| RemoteError::Transport {
            url: url.to_string(),
            source,
        })
    }

    async fn get_listing<T: DeserializeOwned>(&self, base: &str, offset: usize, limit: usize) -> RemoteResult<Listing<T>> {
        let url = format!("{}?limit={}&offset={}", base, limit, offset);
        let response = self.send(self.request(Method::GET, &url), &url).await?;
        let body = Self::read_body(response, &url).await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn version(&self) -> RemoteResult<u64> {
        let url = self.config.version_url();
        let response = self.send(self.request(Method::GET, &url), &url).await?;
        let body = Self::read_body(response, &url).await?;
        let text = body.trim();
        text.parse::<u64>()
            .map_err(|_| RemoteError::InvalidVersion(text.to_string()))
    }

    async fn redirects(&self, offset: usize, limit: usize) -> RemoteResult<Listing<Redirect>> {
        self.get_listing(&self.config.redirects_url(), offset, limit).await
    }

    async fn pages(&self, offset: usize, limit: usize) -> RemoteResult<Listing<Page>> {
        self.get_listing(&self.config.pages_url(), offset, limit).await
    }

    async fn post_status(&self, status: &AgentStatus) -> RemoteResult<()> {
        status.validate()?;
        let url = self.config.agents_url();
        self.send(self.request(Method::POST, &url).json(status), &url).await?;
        Ok(())
    }

    async fn post_hit(&self, name: &str) -> RemoteResult<()> {
        let url = self.config.agent_hit_url(name);
        self.send(self.request(Method::PATCH, &url), &url).await?;
        Ok(())
    }
}
