//! Route guard for the protected part of the dashboard.
//!
//! The guard only checks that a bearer token is stored. It does not decode
//! or validate it; an expired token gets through and is caught by the API
//! client's 401 handling on the first request.

use pharmaec_core::{KeyValueStore, SessionStore};

/// Public sign-in route.
pub const LOGIN_PATH: &str = "/login";

/// Root of the protected subtree; also where unknown paths land.
pub const HOME_PATH: &str = "/";

/// Outcome of entering a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected shell.
    Render,
    /// Replace the current history entry with this path.
    Redirect(&'static str),
}

/// Decides whether a protected route may render.
#[must_use]
pub fn check_access<S: KeyValueStore>(store: &SessionStore<S>) -> GuardDecision {
    if store.has_access_token() {
        GuardDecision::Render
    } else {
        tracing::debug!("no access token, redirecting to login");
        GuardDecision::Redirect(LOGIN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaec_core::{MemoryStore, keys};

    #[test]
    fn missing_token_redirects_to_login() {
        let store = SessionStore::new(MemoryStore::new());
        assert_eq!(check_access(&store), GuardDecision::Redirect("/login"));
    }

    #[test]
    fn any_token_renders() {
        let store = SessionStore::new(MemoryStore::with_entries([(
            keys::ACCESS_TOKEN,
            "not-even-a-jwt",
        )]));
        assert_eq!(check_access(&store), GuardDecision::Render);
    }

    #[test]
    fn refresh_token_alone_is_not_enough() {
        let store = SessionStore::new(MemoryStore::with_entries([(keys::REFRESH_TOKEN, "r")]));
        assert_eq!(check_access(&store), GuardDecision::Redirect(LOGIN_PATH));
    }
}
