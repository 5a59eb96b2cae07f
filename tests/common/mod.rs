//! Shared utilities for integration testing: a programmable mock manager on
//! a real TCP socket.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use rule_agent::config::AgentConfig;
use rule_agent::matching::{Page, Redirect};

pub const NAMESPACE: &str = "acme";
pub const PROJECT: &str = "website";
pub const TOKEN: &str = "s3cret";
pub const AGENT_NAME: &str = "edge-1";

/// One request as seen by the mock manager.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query(&self, key: &str) -> Option<usize> {
        let (_, query) = self.target.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.parse().ok())
    }
}

pub struct MockManager {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockManager {
    /// Start a mock manager answering every request with `handler`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((mut socket, _)) => {
                        let handler = handler.clone();
                        let recorded = recorded.clone();
                        tokio::spawn(async move {
                            if let Some(request) = read_request(&mut socket).await {
                                let (status, body) = handler(&request);
                                recorded.lock().unwrap().push(request);
                                write_response(socket, status, &body).await;
                            }
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self { addr, requests }
    }

    /// Start a mock manager serving the API from `state`.
    pub async fn serve(state: Arc<ManagerState>) -> Self {
        Self::start(move |request| state.handle(request)).await
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path().ends_with(suffix))
            .collect()
    }

    /// Agent configuration pointing at this manager.
    pub fn config(&self) -> AgentConfig {
        let mut config = AgentConfig {
            manager_url: format!("{}/", self.url()),
            namespace: NAMESPACE.to_string(),
            project: PROJECT.to_string(),
            ..AgentConfig::default()
        };
        config.agent.name = AGENT_NAME.to_string();
        config.agent.interval_check_secs = 1;
        config.http.token = TOKEN.to_string();
        config.http.timeout_secs = 5;
        config
    }
}

/// Scripted manager contents.
#[derive(Default)]
pub struct ManagerState {
    pub version: AtomicU64,
    pub redirects: Mutex<Vec<Redirect>>,
    pub pages: Mutex<Vec<Page>>,
    pub fail_pages: AtomicBool,
    pub version_body: Mutex<Option<String>>,
}

impl ManagerState {
    pub fn new(version: u64, redirects: Vec<Redirect>, pages: Vec<Page>) -> Arc<Self> {
        Arc::new(Self {
            version: AtomicU64::new(version),
            redirects: Mutex::new(redirects),
            pages: Mutex::new(pages),
            ..Self::default()
        })
    }

    fn handle(&self, request: &RecordedRequest) -> (u16, String) {
        if request.header("authorization") != Some(format!("Bearer {}", TOKEN).as_str()) {
            return (401, "missing token".to_string());
        }

        let prefix = format!("/api/namespace/{}/project/{}", NAMESPACE, PROJECT);
        let Some(route) = request.path().strip_prefix(&prefix) else {
            return (404, "not found".to_string());
        };

        match (request.method.as_str(), route) {
            ("GET", "/version") => match self.version_body.lock().unwrap().clone() {
                Some(body) => (200, body),
                None => (200, format!("{}\n", self.version.load(Ordering::SeqCst))),
            },
            ("GET", "/redirects") => (200, listing(&self.redirects.lock().unwrap(), request)),
            ("GET", "/pages") if self.fail_pages.load(Ordering::SeqCst) => (500, "pages unavailable".to_string()),
            ("GET", "/pages") => (200, listing(&self.pages.lock().unwrap(), request)),
            ("POST", "/agents") => (200, "{}".to_string()),
            ("PATCH", path) if path == format!("/agents/{}/hit", AGENT_NAME) => (200, String::new()),
            _ => (404, "not found".to_string()),
        }
    }
}

fn listing<T: Serialize>(items: &[T], request: &RecordedRequest) -> String {
    let offset = request.query("offset").unwrap_or(0);
    let limit = request.query("limit").unwrap_or(items.len());
    let end = offset.saturating_add(limit).min(items.len());
    let page = items.get(offset.min(end)..end).unwrap_or_default();
    json!({ "items": page, "total": items.len() }).to_string()
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

async fn write_response(mut socket: TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}
