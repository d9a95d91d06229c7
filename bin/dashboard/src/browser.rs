//! Browser glue: `localStorage`, page origin, hard redirects and the theme
//! class on `<html>`.
//!
//! On the server none of these exist. The server build gets an empty
//! in-memory store and no-op redirects; the protected shell never renders
//! there, so nothing observes the difference.

use pharmaec_api::API_PREFIX;
use pharmaec_core::KeyValueStore;
use pharmaec_navigation::Theme;
use std::sync::Arc;

/// [`KeyValueStore`] over `window.localStorage`.
///
/// Storage can be unavailable (private browsing, disabled by policy); reads
/// then return nothing and writes are logged and dropped.
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

#[cfg(feature = "hydrate")]
impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(feature = "hydrate")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    tracing::warn!(key, "localStorage write rejected");
                }
            }
            None => tracing::warn!(key, "localStorage unavailable"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(key).is_err() {
                tracing::warn!(key, "localStorage remove rejected");
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            if storage.clear().is_err() {
                tracing::warn!("localStorage clear rejected");
            }
        }
    }
}

/// The store session credentials and preferences live in.
#[must_use]
pub fn local_store() -> Arc<dyn KeyValueStore> {
    #[cfg(feature = "hydrate")]
    {
        Arc::new(BrowserStore)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Arc::new(pharmaec_core::MemoryStore::new())
    }
}

/// Absolute base URL of the API, on the page's own origin.
#[must_use]
pub fn api_base_url() -> String {
    #[cfg(feature = "hydrate")]
    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    #[cfg(not(feature = "hydrate"))]
    let origin: Option<String> = None;

    format!(
        "{}{API_PREFIX}",
        origin.unwrap_or_else(|| "http://localhost:3000".to_string())
    )
}

/// Replaces the current page with `path`, dropping all in-memory state.
pub fn hard_redirect(path: &str) {
    #[cfg(feature = "hydrate")]
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.location().replace(path) {
            tracing::warn!(?err, path, "redirect failed");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    tracing::debug!(path, "redirect requested outside the browser");
}

/// Reflects `theme` on the document root as the `dark` class.
pub fn apply_theme(theme: Theme) {
    #[cfg(feature = "hydrate")]
    {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element());
        if let Some(root) = root {
            let result = if theme.is_dark() {
                root.class_list().add_1("dark")
            } else {
                root.class_list().remove_1("dark")
            };
            if let Err(err) = result {
                tracing::warn!(?err, "failed to apply theme");
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = theme;
}
