//! Session lifecycle for the signed-in user.
//!
//! A session exists as long as a bearer token sits in storage. Loading a
//! session means asking the backend who that token belongs to; the answer is
//! the [`Principal`] every permission check runs against.

use async_trait::async_trait;
use pharmaec_core::{KeyValueStore, SessionStore};

use crate::checker::PermissionChecker;
use crate::error::FetchError;
use crate::principal::Principal;

/// The backend's "who am I" endpoint.
///
/// Futures are not required to be `Send`: in the browser build the HTTP
/// client is bound to the single JS thread.
#[async_trait(?Send)]
pub trait PrincipalSource {
    /// Fetches the principal for the stored bearer token.
    async fn fetch_principal(&self) -> Result<Principal, FetchError>;
}

#[async_trait(?Send)]
impl<T: PrincipalSource + ?Sized> PrincipalSource for std::sync::Arc<T> {
    async fn fetch_principal(&self) -> Result<Principal, FetchError> {
        (**self).fetch_principal().await
    }
}

/// What the UI knows about the session at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// The signed-in principal, if the last load succeeded.
    pub principal: Option<Principal>,
    /// True until the first load completes.
    pub loading: bool,
    /// Message from the last failed load.
    pub error: Option<String>,
}

impl SessionState {
    /// The state before the first load has finished.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            principal: None,
            loading: true,
            error: None,
        }
    }

    /// No credentials and no error.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            principal: None,
            loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            principal: None,
            loading: false,
            error: Some(message.into()),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// A permission checker for the current principal, anonymous when
    /// there is none.
    #[must_use]
    pub fn checker(&self) -> PermissionChecker {
        PermissionChecker::new(self.principal.as_ref())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

/// Loads and reloads the session principal.
#[derive(Debug, Clone)]
pub struct SessionLoader<S, P> {
    store: SessionStore<S>,
    source: P,
}

impl<S: KeyValueStore, P: PrincipalSource> SessionLoader<S, P> {
    #[must_use]
    pub fn new(store: S, source: P) -> Self {
        Self {
            store: SessionStore::new(store),
            source,
        }
    }

    /// Returns the typed storage view.
    #[must_use]
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Resolves the current session.
    ///
    /// Without a stored bearer token this returns immediately without a
    /// network call. A 401 from the backend purges the stored credentials;
    /// any other failure leaves them in place so a later retry can succeed.
    pub async fn load(&self) -> SessionState {
        if !self.store.has_access_token() {
            tracing::debug!("no access token stored, session is signed out");
            return SessionState::signed_out();
        }

        match self.source.fetch_principal().await {
            Ok(principal) => {
                self.store
                    .cache_profile(principal.full_name(), principal.role().as_str());
                tracing::info!(
                    user_id = %principal.id(),
                    role = %principal.role(),
                    permissions = principal.permissions().len(),
                    "session loaded"
                );
                SessionState::authenticated(principal)
            }
            Err(err) if err.is_unauthorized() => {
                tracing::warn!(error = %err, "session rejected by backend, clearing credentials");
                self.store.purge_session();
                SessionState::failed(err.message())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load session");
                SessionState::failed(err.message())
            }
        }
    }

    /// Re-runs [`Self::load`]. Concurrent refreshes are not de-duplicated;
    /// whichever finishes last determines the state the caller keeps.
    pub async fn refresh(&self) -> SessionState {
        self.load().await
    }
}
