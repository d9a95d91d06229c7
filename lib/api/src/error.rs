//! Error types for the REST client.
//!
//! Errors are designed for layered context using rootcause:
//! - `TransportError`: the request never produced an HTTP response
//! - `ApiError`: what callers of the client see

use serde_json::Value;
use std::fmt;

/// Failures below HTTP: connection, TLS, body read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request was sent but no response arrived.
    RequestFailed { details: String },
    /// The response body could not be read.
    BodyUnreadable { details: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { details } => write!(f, "request failed: {details}"),
            Self::BodyUnreadable { details } => write!(f, "failed to read response body: {details}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend could not be reached.
    Transport { message: String },
    /// The backend answered with a non-success status.
    Status { status: u16, message: String },
    /// The credentials were rejected and could not be refreshed. Local
    /// credentials have already been purged.
    SessionExpired,
    /// The response body did not have the expected shape.
    Decode { message: String },
}

impl ApiError {
    /// Builds a status error from a response body, preferring the backend's
    /// own `detail` or `message` field.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self::Status { status, message }
    }

    /// The HTTP status, for status errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// True for 401 responses and expired sessions.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.is_session_expired() || self.status() == Some(401)
    }

    /// A message suitable for a toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { .. } => "Unable to reach the server. Check your connection.".to_string(),
            Self::Status { message, .. } => message.clone(),
            Self::SessionExpired => "Your session has expired. Please sign in again.".to_string(),
            Self::Decode { .. } => "The server returned an unexpected response.".to_string(),
        }
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Handles `{"detail": "..."}`, validation errors shaped as
/// `{"detail": [{"msg": "..."}]}` and `{"message": "..."}`.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    value
        .get("message")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "transport error: {message}"),
            Self::Status { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::SessionExpired => write!(f, "session expired"),
            Self::Decode { message } => write!(f, "failed to decode response: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_preferred() {
        let err = ApiError::from_response(400, r#"{"detail":"Warehouse code already exists","message":"x"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                message: "Warehouse code already exists".to_string()
            }
        );
    }

    #[test]
    fn validation_errors_are_joined() {
        let body = r#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"msg":"too short"}]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(err.user_message(), "field required; too short");
    }

    #[test]
    fn message_field_and_fallback() {
        let err = ApiError::from_response(500, r#"{"success":false,"message":"Database unavailable"}"#);
        assert_eq!(err.user_message(), "Database unavailable");

        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.user_message(), "request failed with status 502");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn unauthorized_classification() {
        assert!(ApiError::SessionExpired.is_unauthorized());
        assert!(ApiError::from_response(401, "{}").is_unauthorized());
        assert!(!ApiError::from_response(403, "{}").is_unauthorized());
        assert!(ApiError::SessionExpired.to_string().contains("expired"));
    }
}
