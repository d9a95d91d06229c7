//! Navigation model for the PharmaEC dashboard.
//!
//! This crate provides:
//! - Navigation entries and their visibility gates (`NavEntry`, `Gate`)
//! - The static sidebar tree (`SIDEBAR`)
//! - Sidebar expansion and icon-only state (`SidebarState`)
//! - Layout preferences (`Theme`)
//! - The presence-only route guard (`check_access`)
//!
//! Nothing here touches the DOM; the dashboard binary renders these models.

pub mod entry;
pub mod guard;
pub mod prefs;
pub mod sidebar;
pub mod tree;

pub use entry::{Gate, NavEntry, NavLeaf, VisibleEntry, route_matches, visible_entries};
pub use guard::{GuardDecision, HOME_PATH, LOGIN_PATH, check_access};
pub use prefs::Theme;
pub use sidebar::{EntryState, SidebarState};
pub use tree::{SIDEBAR, title_for};
