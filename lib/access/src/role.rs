//! Role tags.
//!
//! A principal carries exactly one role tag. One value, `super_admin`,
//! bypasses every permission check. The remaining tags only matter for
//! display; access is decided by permission codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role tag that bypasses permission checks.
pub const SUPER_ADMIN: &str = "super_admin";

/// A principal's role tag, compared by exact string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Creates a role from its tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The super-admin role.
    #[must_use]
    pub fn super_admin() -> Self {
        Self::new(SUPER_ADMIN)
    }

    /// Returns the raw tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the tag that bypasses permission checks.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.0 == SUPER_ADMIN
    }

    /// Human-readable role name. Unknown tags are shown as-is.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.0.as_str() {
            "super_admin" => "Super Admin",
            "warehouse_admin" => "Warehouse Admin",
            "shop_owner" => "Shop Owner",
            "pharmacist" => "Pharmacist",
            "cashier" => "Cashier",
            "hr_manager" => "HR Manager",
            other => other,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_exact_tag_is_super_admin() {
        assert!(Role::super_admin().is_super_admin());
        assert!(!Role::from("Super_Admin").is_super_admin());
        assert!(!Role::from("super_admin ").is_super_admin());
        assert!(!Role::from("warehouse_admin").is_super_admin());
    }

    #[test]
    fn display_names() {
        assert_eq!(Role::from("hr_manager").display_name(), "HR Manager");
        assert_eq!(Role::from("cashier").display_name(), "Cashier");
        assert_eq!(Role::from("auditor").display_name(), "auditor");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::from("pharmacist")).expect("serialize");
        assert_eq!(json, "\"pharmacist\"");
    }
}
