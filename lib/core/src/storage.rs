//! Persistent key-value storage.
//!
//! The browser's `localStorage` is the only mutable state shared between
//! components: session credentials, cached display fields and layout
//! preferences all live there as flat string pairs. Business logic never
//! touches the browser API directly; it goes through [`KeyValueStore`], which
//! the dashboard implements over `localStorage` and tests implement with
//! [`MemoryStore`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Storage keys. These names are a contract with existing browser profiles
/// and must not change.
pub mod keys {
    /// Bearer token sent with every API call.
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Token exchanged for a new access token after a 401.
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Cached display name. Advisory only.
    pub const USER_NAME: &str = "user_name";
    /// Cached role tag. Advisory only, never used for permission checks.
    pub const USER_ROLE: &str = "user_role";
    /// `"true"` when the sidebar is in icon-only mode.
    pub const SIDEBAR_COLLAPSED: &str = "sidebarCollapsed";
    /// `"dark"` or `"light"`.
    pub const THEME: &str = "theme";

    /// Keys removed when the session ends.
    pub const SESSION_KEYS: [&str; 4] = [ACCESS_TOKEN, REFRESH_TOKEN, USER_NAME, USER_ROLE];
}

/// A flat string key-value store with browser `localStorage` semantics.
///
/// Writes are fire-and-forget: implementations that can fail (quota, private
/// browsing) log the failure and carry on.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Removes `key` if present.
    fn remove(&self, key: &str);

    /// Removes every key.
    fn clear(&self);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

/// In-memory store. Clones share the same underlying map, which makes a
/// clone behave like the same browser profile after a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

/// Typed accessors for the dashboard's storage keys.
///
/// This is the explicit interface the rest of the workspace uses; the raw
/// key names stay in one place.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    inner: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Wraps a key-value store.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the stored bearer token. Empty strings count as absent.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.inner.get(keys::ACCESS_TOKEN).filter(|t| !t.is_empty())
    }

    /// Returns true if a bearer token is stored.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }

    /// Returns the stored refresh token. Empty strings count as absent.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.get(keys::REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    /// Stores the access token and, when given, the refresh token.
    ///
    /// A `None` refresh token leaves the current one in place.
    pub fn store_tokens(&self, access_token: &str, refresh_token: Option<&str>) {
        self.inner.set(keys::ACCESS_TOKEN, access_token);
        if let Some(refresh_token) = refresh_token {
            self.inner.set(keys::REFRESH_TOKEN, refresh_token);
        }
    }

    /// Caches the principal's display name and role for fast reads.
    pub fn cache_profile(&self, user_name: &str, user_role: &str) {
        self.inner.set(keys::USER_NAME, user_name);
        self.inner.set(keys::USER_ROLE, user_role);
    }

    /// Returns the cached display name.
    #[must_use]
    pub fn cached_user_name(&self) -> Option<String> {
        self.inner.get(keys::USER_NAME)
    }

    /// Returns the cached role tag.
    #[must_use]
    pub fn cached_user_role(&self) -> Option<String> {
        self.inner.get(keys::USER_ROLE)
    }

    /// Removes credentials and cached display fields.
    ///
    /// Layout preferences survive; they belong to the browser, not the session.
    pub fn purge_session(&self) {
        for key in keys::SESSION_KEYS {
            self.inner.remove(key);
        }
        tracing::debug!("session credentials purged from storage");
    }

    /// Returns true if the sidebar was last left in icon-only mode.
    #[must_use]
    pub fn sidebar_collapsed(&self) -> bool {
        self.inner.get(keys::SIDEBAR_COLLAPSED).as_deref() == Some("true")
    }

    /// Persists the sidebar collapse flag as `"true"`/`"false"`.
    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        let value = if collapsed { "true" } else { "false" };
        self.inner.set(keys::SIDEBAR_COLLAPSED, value);
    }

    /// Returns the raw stored theme name.
    #[must_use]
    pub fn theme(&self) -> Option<String> {
        self.inner.get(keys::THEME)
    }

    /// Persists the theme name.
    pub fn set_theme(&self, theme: &str) {
        self.inner.set(keys::THEME, theme);
    }
}
