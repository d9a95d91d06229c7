//! Permission model and session lifecycle for the PharmaEC dashboard.
//!
//! This crate provides:
//! - The permission predicate library (`PermissionSet`, `PermissionCode`)
//! - The permission code catalogue (`codes`)
//! - Role tags and the super-admin override (`Role`, `PermissionChecker`)
//! - Declarative gates for inline elements (`GateRule`)
//! - The session principal and its loader (`Principal`, `SessionLoader`)
//!
//! # Access Control Model
//!
//! A principal holds one role and a flat list of permission strings of the
//! form `module.action[.scope]`. Every check is answered from that list,
//! except for the `super_admin` role, which passes everything.
//!
//! # Example
//!
//! ```
//! use pharmaec_access::{GateRule, PermissionChecker, PermissionSet, Principal, codes};
//!
//! let permissions: PermissionSet = [codes::BILLING_CREATE_SHOP, codes::BILLING_VIEW_SHOP]
//!     .into_iter()
//!     .collect();
//! let cashier = Principal::new("u-7", "cashier@pharmaec.in", "Meera", "cashier", permissions);
//! let checker = PermissionChecker::new(Some(&cashier));
//!
//! assert!(checker.has_permission(codes::BILLING_CREATE_SHOP));
//! assert!(!checker.allows(&GateRule::permission(codes::WAREHOUSES_VIEW)));
//! assert_eq!(checker.scope_for_permission("billing.view"), Some("shop"));
//! ```

pub mod checker;
pub mod codes;
pub mod error;
pub mod permission;
pub mod principal;
pub mod role;
pub mod session;

// Re-export main types at crate root
pub use checker::{GateRule, PermissionChecker};
pub use error::FetchError;
pub use permission::{PermissionCode, PermissionSet, Scope};
pub use principal::Principal;
pub use role::Role;
pub use session::{PrincipalSource, SessionLoader, SessionState};
