//! Sidebar expansion and collapse state.
//!
//! Two independent pieces of state live here. Each group is either expanded
//! or collapsed, and the sidebar as a whole is either full width or
//! icon-only. Only the latter is persisted.

use std::collections::BTreeSet;

use pharmaec_access::PermissionChecker;
use pharmaec_core::{KeyValueStore, SessionStore};

use crate::entry::NavEntry;

/// How one entry renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// The gate failed; nothing is rendered.
    Hidden,
    /// A group showing only its header.
    Collapsed,
    /// A group showing its children.
    Expanded,
    /// A plain link.
    LeafVisible,
}

/// Per-user sidebar state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarState {
    expanded: BTreeSet<&'static str>,
    collapsed: bool,
}

impl SidebarState {
    /// Starts with every group collapsed and the given sidebar width.
    #[must_use]
    pub fn new(collapsed: bool) -> Self {
        Self {
            expanded: BTreeSet::new(),
            collapsed,
        }
    }

    /// Restores the persisted icon-only flag.
    #[must_use]
    pub fn restore<S: KeyValueStore>(store: &SessionStore<S>) -> Self {
        Self::new(store.sidebar_collapsed())
    }

    /// Returns true if the sidebar is in icon-only mode.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Switches between full width and icon-only mode and persists the
    /// result.
    pub fn toggle_collapsed<S: KeyValueStore>(&mut self, store: &SessionStore<S>) {
        self.collapsed = !self.collapsed;
        store.set_sidebar_collapsed(self.collapsed);
        tracing::debug!(collapsed = self.collapsed, "sidebar width toggled");
    }

    /// Returns true if the group at `group_path` is open.
    #[must_use]
    pub fn is_expanded(&self, group_path: &str) -> bool {
        self.expanded.contains(group_path)
    }

    /// Flips one group. Other groups are unaffected.
    pub fn toggle_group(&mut self, group_path: &'static str) {
        if !self.expanded.remove(group_path) {
            self.expanded.insert(group_path);
        }
    }

    /// Opens every group containing `active_path`.
    ///
    /// Never closes a group, so calling this repeatedly with the same path
    /// is a no-op after the first call. Returns true if anything opened.
    pub fn reveal_route(&mut self, tree: &'static [NavEntry], active_path: &str) -> bool {
        let mut changed = false;
        for entry in tree.iter().filter(|e| e.contains_route(active_path)) {
            changed |= self.expanded.insert(entry.path);
        }
        changed
    }

    /// Resolves how `entry` renders for `checker`.
    #[must_use]
    pub fn entry_state(&self, entry: &NavEntry, checker: &PermissionChecker) -> EntryState {
        if !entry.gate.permits(checker) {
            EntryState::Hidden
        } else if !entry.is_group() {
            EntryState::LeafVisible
        } else if self.is_expanded(entry.path) {
            EntryState::Expanded
        } else {
            EntryState::Collapsed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SIDEBAR;
    use pharmaec_access::{PermissionSet, Role};
    use pharmaec_core::{MemoryStore, keys};

    fn entry(path: &str) -> &'static NavEntry {
        SIDEBAR
            .iter()
            .find(|e| e.path == path)
            .expect("entry exists")
    }

    fn admin() -> PermissionChecker {
        PermissionChecker::from_parts(Role::super_admin(), PermissionSet::empty())
    }

    #[test]
    fn route_change_expands_the_owning_group() {
        let mut state = SidebarState::default();

        assert!(state.reveal_route(SIDEBAR, "/inventory/entry"));
        assert!(state.is_expanded("/inventory"));
        assert!(!state.is_expanded("/sales"));
        assert_eq!(state.entry_state(entry("/inventory"), &admin()), EntryState::Expanded);
    }

    #[test]
    fn nested_detail_routes_expand_too() {
        let mut state = SidebarState::default();
        state.reveal_route(SIDEBAR, "/medicines/abc-123/batches");
        assert!(state.is_expanded("/masters"));
    }

    #[test]
    fn reveal_is_idempotent_and_monotonic() {
        let mut state = SidebarState::default();
        state.reveal_route(SIDEBAR, "/hr/payroll");
        let snapshot = state.clone();

        assert!(!state.reveal_route(SIDEBAR, "/hr/payroll"));
        assert!(!state.reveal_route(SIDEBAR, "/hr/payroll"));
        assert_eq!(state, snapshot);

        // Leaving the group does not close it.
        state.reveal_route(SIDEBAR, "/warehouses");
        assert!(state.is_expanded("/hr"));
    }

    #[test]
    fn toggle_group_is_independent() {
        let mut state = SidebarState::default();
        state.toggle_group("/sales");
        state.toggle_group("/hr");
        state.toggle_group("/sales");

        assert!(!state.is_expanded("/sales"));
        assert!(state.is_expanded("/hr"));
    }

    #[test]
    fn entry_states() {
        let state = SidebarState::default();
        let cashier = PermissionChecker::from_parts(Role::from("cashier"), PermissionSet::empty());

        assert_eq!(state.entry_state(entry("/"), &cashier), EntryState::LeafVisible);
        assert_eq!(state.entry_state(entry("/warehouses"), &cashier), EntryState::Hidden);
        assert_eq!(state.entry_state(entry("/settings"), &admin()), EntryState::Collapsed);
    }

    #[test]
    fn collapse_flag_survives_reload() {
        let storage = MemoryStore::new();
        let session = SessionStore::new(storage.clone());

        let mut state = SidebarState::restore(&session);
        assert!(!state.is_collapsed());
        state.toggle_collapsed(&session);
        assert_eq!(storage.get(keys::SIDEBAR_COLLAPSED).as_deref(), Some("true"));

        // A fresh store over the same profile is a page reload.
        let reloaded = SidebarState::restore(&SessionStore::new(storage.clone()));
        assert!(reloaded.is_collapsed());

        let mut reloaded = reloaded;
        reloaded.toggle_collapsed(&session);
        assert_eq!(storage.get(keys::SIDEBAR_COLLAPSED).as_deref(), Some("false"));
    }
}
