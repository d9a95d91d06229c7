//! Layout preferences that outlive a session.

use pharmaec_core::{KeyValueStore, SessionStore};
use std::fmt;

/// Colour scheme for the dashboard shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parses a stored theme name. Anything but `"dark"` is light.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "dark" { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Reads the stored theme, defaulting to light.
    #[must_use]
    pub fn restore<S: KeyValueStore>(store: &SessionStore<S>) -> Self {
        store.theme().map(|t| Self::parse(&t)).unwrap_or_default()
    }

    /// Persists this theme.
    pub fn persist<S: KeyValueStore>(self, store: &SessionStore<S>) {
        store.set_theme(self.as_str());
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaec_core::MemoryStore;

    #[test]
    fn defaults_to_light() {
        let store = SessionStore::new(MemoryStore::new());
        assert_eq!(Theme::restore(&store), Theme::Light);
        assert_eq!(Theme::parse("solarized"), Theme::Light);
    }

    #[test]
    fn toggle_round_trips_through_storage() {
        let store = SessionStore::new(MemoryStore::new());

        let theme = Theme::restore(&store).toggled();
        theme.persist(&store);

        assert!(Theme::restore(&store).is_dark());
        assert_eq!(store.theme().as_deref(), Some("dark"));
        assert_eq!(theme.toggled().to_string(), "light");
    }
}
