//! Reactive contexts shared by the dashboard.
//!
//! Two contexts exist:
//! - [`SessionContext`], provided by [`crate::app::App`] for the whole tree:
//!   the API client and the current [`SessionState`].
//! - The permission checker, provided by the authenticated layout only.
//!   [`use_permissions`] panics anywhere else; a missing provider is a bug
//!   in the view tree, not a state to render around.

use leptos::prelude::*;
use leptos::task::spawn_local;
use pharmaec_access::{PermissionChecker, SessionLoader, SessionState};
use pharmaec_api::{ApiClient, ReqwestTransport};
use pharmaec_navigation::LOGIN_PATH;
use std::sync::Arc;

use crate::browser;

/// Session handle: the API client plus the reactive session state.
#[derive(Clone, Copy)]
pub struct SessionContext {
    state: RwSignal<SessionState>,
    api: StoredValue<ApiClient>,
}

impl SessionContext {
    /// Wraps `api` with a session in the loading state.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            state: RwSignal::new(SessionState::loading()),
            api: StoredValue::new(api),
        }
    }

    /// The client every page uses for backend calls.
    #[must_use]
    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> Signal<SessionState> {
        self.state.into()
    }

    /// Re-runs the principal fetch and publishes the result.
    ///
    /// Concurrent calls are not de-duplicated; whichever finishes last wins.
    pub fn refresh(&self) {
        let api = self.api();
        let state = self.state;
        spawn_local(async move {
            let loader = SessionLoader::new(api.store().inner().clone(), api);
            state.set(loader.load().await);
        });
    }

    /// Ends the session on the backend and locally, then leaves the
    /// protected area.
    pub fn sign_out(&self) {
        let api = self.api();
        let state = self.state;
        spawn_local(async move {
            api.logout().await;
            state.set(SessionState::signed_out());
            browser::hard_redirect(LOGIN_PATH);
        });
    }
}

/// Builds the browser API client. When the client gives up on a session it
/// sends the browser to the login page.
#[must_use]
pub fn browser_client() -> ApiClient {
    let transport = Arc::new(ReqwestTransport::new(browser::api_base_url()));
    ApiClient::new(transport, browser::local_store())
        .with_logout_hook(Arc::new(|| browser::hard_redirect(LOGIN_PATH)))
}

/// Provides the session context for the subtree.
pub fn provide_session(api: ApiClient) -> SessionContext {
    let session = SessionContext::new(api);
    provide_context(session);
    session
}

/// Returns the session context.
///
/// # Panics
///
/// Panics if called outside [`crate::app::App`].
#[must_use]
pub fn use_session() -> SessionContext {
    match use_context::<SessionContext>() {
        Some(session) => session,
        None => panic!("use_session() called outside the App component"),
    }
}

#[derive(Clone, Copy)]
struct Permissions(Signal<PermissionChecker>);

/// Provides the permission checker for the authenticated subtree.
pub fn provide_permissions(checker: Signal<PermissionChecker>) {
    provide_context(Permissions(checker));
}

/// Returns the permission checker of the signed-in principal.
///
/// # Panics
///
/// Panics if called outside the authenticated layout.
#[must_use]
pub fn use_permissions() -> Signal<PermissionChecker> {
    match use_context::<Permissions>() {
        Some(Permissions(checker)) => checker,
        None => panic!("use_permissions() called outside the authenticated layout"),
    }
}
