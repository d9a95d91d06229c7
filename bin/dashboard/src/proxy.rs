//! Forwarding of `/api/v1/*` to the REST backend.
//!
//! The dashboard's API client always talks to its own origin. This module
//! relays those calls to the configured backend, preserving method, path,
//! query, body and the headers the backend cares about, and hands the
//! backend's status and body back unchanged.

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Uri};
use axum::response::{IntoResponse, Response};
use rootcause::prelude::Report;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Request headers forwarded to the backend.
const FORWARDED_HEADERS: [HeaderName; 3] = [AUTHORIZATION, CONTENT_TYPE, ACCEPT];

/// Relays API calls to the backend.
#[derive(Debug, Clone)]
pub struct BackendProxy {
    client: reqwest::Client,
    backend_url: String,
    max_body_bytes: usize,
}

impl BackendProxy {
    /// Builds the proxy from server configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ServerConfig) -> Result<Self, Report<ServerError>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.proxy.timeout_seconds))
            .build()
            .map_err(|e| ServerError::Configuration {
                details: e.to_string(),
            })?;
        Ok(Self {
            client,
            backend_url: config.backend_url.clone(),
            max_body_bytes: config.proxy.max_body_bytes,
        })
    }

    /// The backend URL a request for `uri` is sent to.
    #[must_use]
    pub fn upstream_url(&self, uri: &Uri) -> String {
        let path_and_query = uri
            .path_and_query()
            .map_or_else(|| uri.path(), |pq| pq.as_str());
        format!("{}{path_and_query}", self.backend_url)
    }

    /// Sends `request` to the backend and converts the answer back.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is too large, or if the backend cannot
    /// be reached or its body cannot be read. Non-2xx answers are not
    /// errors; they are relayed as-is.
    pub async fn forward(&self, request: Request) -> Result<Response, Report<ServerError>> {
        let (parts, body) = request.into_parts();
        let url = self.upstream_url(&parts.uri);

        let body = to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| ServerError::RequestBody {
                details: e.to_string(),
            })?;

        let mut upstream = self.client.request(parts.method.clone(), &url);
        for name in FORWARDED_HEADERS {
            if let Some(value) = parts.headers.get(&name) {
                upstream = upstream.header(name, value.clone());
            }
        }
        if !body.is_empty() {
            upstream = upstream.body(body);
        }

        let answer = upstream
            .send()
            .await
            .map_err(|e| ServerError::BackendUnavailable {
                url: url.clone(),
                details: e.to_string(),
            })?;

        let status = answer.status();
        let content_type = answer.headers().get(CONTENT_TYPE).cloned();
        let bytes = answer.bytes().await.map_err(|e| ServerError::BackendBody {
            details: e.to_string(),
        })?;

        tracing::debug!(method = %parts.method, %url, status = status.as_u16(), "proxied api call");

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        if let Some(content_type) = content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        Ok(response)
    }
}

/// Axum handler for `/api/v1/{*path}`.
pub async fn forward(State(proxy): State<Arc<BackendProxy>>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    match proxy.forward(request).await {
        Ok(response) => response,
        Err(report) => {
            tracing::warn!(error = %report, %method, %path, "api proxy failed");
            report.current_context().clone().into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;

    fn proxy() -> BackendProxy {
        BackendProxy::new(&ServerConfig {
            backend_url: "http://backend:8000".to_string(),
            proxy: ProxyConfig::default(),
        })
        .unwrap()
    }

    #[test]
    fn upstream_url_keeps_path_and_query() {
        let uri: Uri = "/api/v1/warehouses?page=2&size=10&status=active"
            .parse()
            .unwrap();
        assert_eq!(
            proxy().upstream_url(&uri),
            "http://backend:8000/api/v1/warehouses?page=2&size=10&status=active"
        );
    }

    #[test]
    fn upstream_url_without_query() {
        let uri: Uri = "/api/v1/auth/me".parse().unwrap();
        assert_eq!(proxy().upstream_url(&uri), "http://backend:8000/api/v1/auth/me");
    }
}
