//! Error types for the access crate.

use std::fmt;

/// Errors from fetching the current principal.
///
/// The session loader only distinguishes "the backend rejected our token"
/// from everything else, because only the former ends the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The backend answered 401; the stored credentials are no good.
    Unauthorized { message: String },
    /// Network failure, server error or an unreadable payload.
    Failed { message: String },
}

impl FetchError {
    /// Returns true if the failure should end the session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The human-readable message carried by the error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message } | Self::Failed { message } => message,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized { message } => {
                write!(f, "not authenticated: {message}")
            }
            Self::Failed { message } => {
                write!(f, "failed to fetch user: {message}")
            }
        }
    }
}

impl std::error::Error for FetchError {}
