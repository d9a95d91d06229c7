//! Domain error types for the shell server.
//!
//! The browser talks to the backend through this server's `/api/v1` proxy;
//! everything that can go wrong on that path is a [`ServerError`]. Failures
//! are raised as `rootcause::Report<ServerError>` and mapped to a JSON error
//! body the dashboard's API client already knows how to read.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Errors raised while serving the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// Configuration could not be loaded or is invalid.
    Configuration { details: String },
    /// The incoming request body exceeded the configured limit or could
    /// not be read.
    RequestBody { details: String },
    /// The backend could not be reached.
    BackendUnavailable { url: String, details: String },
    /// The backend answered but its body could not be read.
    BackendBody { details: String },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { details } => write!(f, "invalid configuration: {details}"),
            Self::RequestBody { details } => write!(f, "failed to read request body: {details}"),
            Self::BackendUnavailable { url, details } => {
                write!(f, "backend request to '{url}' failed: {details}")
            }
            Self::BackendBody { details } => {
                write!(f, "failed to read backend response: {details}")
            }
        }
    }
}

impl std::error::Error for ServerError {}

impl ServerError {
    /// Status code returned to the browser.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RequestBody { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BackendUnavailable { .. } | Self::BackendBody { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// A user-safe message. Upstream URLs and transport details stay in the
    /// server log.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "Server misconfigured",
            Self::RequestBody { .. } => "Request body too large",
            Self::BackendUnavailable { .. } | Self::BackendBody { .. } => {
                "Backend service unavailable"
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_failures_are_bad_gateway() {
        let err = ServerError::BackendUnavailable {
            url: "http://backend:8000/api/v1/warehouses".to_string(),
            details: "connection refused".to_string(),
        };

        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.public_message(), "Backend service unavailable");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn oversized_bodies_are_rejected_with_413() {
        let err = ServerError::RequestBody {
            details: "length limit exceeded".to_string(),
        };
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
