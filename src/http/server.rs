//! HTTP server answering requests from the current snapshot.
//!
//! # Responsibilities
//! - Resolve every request against the published snapshot (host, path)
//! - Redirect match → rule status + `Location`
//! - Page match → page content with its content type
//! - Otherwise 404
//! - Expose `/_agent/status` for probes

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::lifecycle::ShutdownSignal;
use crate::remote::RemoteSource;
use crate::sync::SyncClient;

/// Path of the built-in status endpoint.
pub const STATUS_PATH: &str = "/_agent/status";

/// Application state injected into handlers.
pub struct AppState<S> {
    pub client: Arc<SyncClient<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AgentSummary {
    pub version: u64,
    pub status: &'static str,
    pub redirects: usize,
    pub pages: usize,
}

/// HTTP server for the host process.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new<S: RemoteSource>(client: Arc<SyncClient<S>>) -> Self {
        Self {
            router: build_router(client),
        }
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

pub fn build_router<S: RemoteSource>(client: Arc<SyncClient<S>>) -> Router {
    Router::new()
        .route(STATUS_PATH, get(agent_status::<S>))
        .fallback(serve_rule::<S>)
        .with_state(AppState { client })
        .layer(TraceLayer::new_for_http())
}

async fn agent_status<S: RemoteSource>(State(state): State<AppState<S>>) -> Json<AgentSummary> {
    let snapshot = state.client.snapshot();
    Json(AgentSummary {
        version: snapshot.version(),
        status: if state.client.is_refreshing() { "refreshing" } else { "idle" },
        redirects: snapshot.redirect_count(),
        pages: snapshot.page_count(),
    })
}

fn request_host(request: &Request<Body>) -> String {
    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()))
        .unwrap_or_default()
}

async fn serve_rule<S: RemoteSource>(State(state): State<AppState<S>>, request: Request<Body>) -> Response {
    let host = request_host(&request);
    let path = request.uri().path();
    let snapshot = state.client.snapshot();

    if let Some((redirect, target)) = snapshot.match_redirect(&host, path) {
        let status = StatusCode::from_u16(redirect.status)
            .ok()
            .filter(StatusCode::is_redirection)
            .unwrap_or(StatusCode::MOVED_PERMANENTLY);
        return match HeaderValue::from_str(&target) {
            Ok(location) => {
                tracing::debug!(host = %host, path = %path, target = %target, status = %status, "Redirect matched");
                (status, [(header::LOCATION, location)]).into_response()
            }
            Err(_) => {
                tracing::warn!(source = %redirect.source, target = %target, "Redirect target is not a valid header value");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }

    if let Some(page) = snapshot.match_page(&host, path) {
        let content_type = HeaderValue::from_str(&page.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("text/plain"));
        return (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], page.content.clone()).into_response();
    }

    (StatusCode::NOT_FOUND, "No matching rule").into_response()
}
