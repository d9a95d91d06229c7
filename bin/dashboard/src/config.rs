//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys:
//!
//! | Variable | Default |
//! |---|---|
//! | `BACKEND_URL` | required |
//! | `PROXY__TIMEOUT_SECONDS` | `30` |
//! | `PROXY__MAX_BODY_BYTES` | `10485760` |
//!
//! Leptos site options (address, asset paths) come from the crate's
//! `[package.metadata.leptos]` table instead.

use rootcause::prelude::Report;
use serde::Deserialize;

use crate::error::ServerError;

/// Shell server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Origin of the REST backend, e.g. `http://localhost:8000`. Requests to
    /// `/api/v1/*` are forwarded there with their path unchanged.
    pub backend_url: String,

    /// API proxy configuration.
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Limits applied to proxied API calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Upstream request timeout, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Largest request body forwarded to the backend.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `BACKEND_URL` is missing or not an http(s) URL.
    pub fn from_env() -> Result<Self, Report<ServerError>> {
        let config: Self = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| ServerError::Configuration {
                details: e.to_string(),
            })?;
        config.validated()
    }

    /// Normalizes the backend URL and rejects values the proxy cannot use.
    fn validated(mut self) -> Result<Self, Report<ServerError>> {
        let url = self.backend_url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ServerError::Configuration {
                details: format!("BACKEND_URL must be an http(s) URL, got '{url}'"),
            }
            .into());
        }
        self.backend_url = url.to_string();
        if self.proxy.timeout_seconds == 0 {
            self.proxy.timeout_seconds = default_timeout_seconds();
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend_url: &str) -> ServerConfig {
        ServerConfig {
            backend_url: backend_url.to_string(),
            proxy: ProxyConfig::default(),
        }
    }

    #[test]
    fn proxy_config_has_correct_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn backend_url_is_normalized() {
        let config = config(" http://localhost:8000/ ").validated().unwrap();
        assert_eq!(config.backend_url, "http://localhost:8000");
    }

    #[test]
    fn non_http_backend_is_rejected() {
        assert!(config("localhost:8000").validated().is_err());
        assert!(config("").validated().is_err());
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let mut config = config("https://api.pharmaec.in");
        config.proxy.timeout_seconds = 0;
        assert_eq!(config.validated().unwrap().proxy.timeout_seconds, 30);
    }
}
