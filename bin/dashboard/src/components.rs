//! Shared UI components.

pub mod header;
pub mod permission_gate;
pub mod sidebar;
pub mod table;
pub mod toast;

pub use header::Header;
pub use permission_gate::PermissionGate;
pub use sidebar::Sidebar;
pub use table::{EmptyState, Pagination, StatusBadge};
pub use toast::{ToastContainer, Toasts, provide_toasts, use_toasts};
