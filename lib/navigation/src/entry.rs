//! Navigation entries and their visibility gates.

use pharmaec_access::PermissionChecker;

/// Who may see a navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Visible to every signed-in principal.
    Universal,
    /// Visible if any listed code is granted. An empty list is universal.
    PermissionGated(&'static [&'static str]),
    /// Never visible to `role`; otherwise behaves like `PermissionGated`.
    ///
    /// This is the one place the super-admin bypass does not apply: an
    /// entry excluding `super_admin` stays hidden for it.
    RoleExcluded {
        role: &'static str,
        codes: &'static [&'static str],
    },
}

impl Gate {
    /// Decides whether `checker`'s principal may see an entry with this gate.
    #[must_use]
    pub fn permits(&self, checker: &PermissionChecker) -> bool {
        match self {
            Self::Universal => true,
            Self::PermissionGated(codes) => codes.is_empty() || checker.has_any_permission(*codes),
            Self::RoleExcluded { role, codes } => {
                let excluded = checker.role().is_some_and(|r| r.as_str() == *role);
                !excluded && (codes.is_empty() || checker.has_any_permission(*codes))
            }
        }
    }
}

/// A child entry inside a group. Leaves cannot nest further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLeaf {
    pub path: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub gate: Gate,
}

/// A top-level sidebar entry, optionally owning one level of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub path: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub gate: Gate,
    pub children: &'static [NavLeaf],
}

impl NavEntry {
    /// Returns true if this entry expands into children rather than linking.
    #[must_use]
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns true if `active_path` is one of this group's children or
    /// lies below one of them.
    #[must_use]
    pub fn contains_route(&self, active_path: &str) -> bool {
        self.children
            .iter()
            .any(|child| route_matches(active_path, child.path))
    }
}

/// True when `active_path` is `path` itself or a sub-path of it.
///
/// `/inventory/entry` matches `/inventory`, `/inventory-old` does not.
#[must_use]
pub fn route_matches(active_path: &str, path: &str) -> bool {
    match active_path.strip_prefix(path) {
        Some("") => true,
        Some(rest) => rest.starts_with('/') && path != "/",
        None => false,
    }
}

/// An entry that passed its gate, with its visible children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleEntry {
    pub entry: &'static NavEntry,
    pub children: Vec<&'static NavLeaf>,
}

/// Filters `tree` down to what `checker` may see.
///
/// Children are gated on their own. A visible group whose children are all
/// hidden is still returned, with an empty child list.
#[must_use]
pub fn visible_entries(
    tree: &'static [NavEntry],
    checker: &PermissionChecker,
) -> Vec<VisibleEntry> {
    tree.iter()
        .filter(|entry| entry.gate.permits(checker))
        .map(|entry| VisibleEntry {
            entry,
            children: entry
                .children
                .iter()
                .filter(|child| child.gate.permits(checker))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaec_access::{PermissionSet, Role};

    fn checker(role: &str, codes: &[&str]) -> PermissionChecker {
        PermissionChecker::from_parts(Role::from(role), codes.iter().copied().collect())
    }

    const EXCLUDE_ADMIN: Gate = Gate::RoleExcluded {
        role: "super_admin",
        codes: &[],
    };

    #[test]
    fn universal_and_empty_gates_are_open() {
        let nobody = checker("cashier", &[]);
        assert!(Gate::Universal.permits(&nobody));
        assert!(Gate::PermissionGated(&[]).permits(&nobody));
        assert!(EXCLUDE_ADMIN.permits(&nobody));
    }

    #[test]
    fn permission_gate_is_any_of() {
        let gate = Gate::PermissionGated(&["shops.view", "warehouses.view"]);
        assert!(gate.permits(&checker("shop_owner", &["shops.view"])));
        assert!(!gate.permits(&checker("shop_owner", &["shops.edit"])));
    }

    #[test]
    fn super_admin_bypasses_except_when_excluded() {
        let admin = PermissionChecker::from_parts(Role::super_admin(), PermissionSet::empty());

        assert!(Gate::PermissionGated(&["payroll.run"]).permits(&admin));
        assert!(!EXCLUDE_ADMIN.permits(&admin));
        assert!(
            !Gate::RoleExcluded {
                role: "super_admin",
                codes: &["inventory.entry.warehouse"],
            }
            .permits(&admin)
        );
    }

    #[test]
    fn role_exclusion_applies_to_the_named_role() {
        let gate = Gate::RoleExcluded {
            role: "cashier",
            codes: &["billing.view.shop"],
        };
        assert!(!gate.permits(&checker("cashier", &["billing.view.shop"])));
        assert!(gate.permits(&checker("pharmacist", &["billing.view.shop"])));
        assert!(!gate.permits(&checker("pharmacist", &[])));
    }

    #[test]
    fn route_matching() {
        assert!(route_matches("/inventory", "/inventory"));
        assert!(route_matches("/inventory/entry", "/inventory"));
        assert!(!route_matches("/inventory-old", "/inventory"));
        assert!(!route_matches("/shops", "/inventory"));
        assert!(route_matches("/", "/"));
        assert!(!route_matches("/shops", "/"));
    }

    static GROUPED: [NavEntry; 2] = [
        NavEntry {
            path: "/hr",
            label: "HR",
            icon: "badge",
            gate: Gate::Universal,
            children: &[NavLeaf {
                path: "/hr/payroll",
                label: "Payroll",
                icon: "payments",
                gate: Gate::PermissionGated(&["salary.manage.shop"]),
            }],
        },
        NavEntry {
            path: "/settings",
            label: "Settings",
            icon: "settings",
            gate: Gate::PermissionGated(&["settings.view"]),
            children: &[],
        },
    ];

    #[test]
    fn visible_group_with_no_visible_children_is_kept() {
        let visible = visible_entries(&GROUPED, &checker("cashier", &[]));

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].entry.label, "HR");
        assert!(visible[0].children.is_empty());
    }

    #[test]
    fn group_contains_child_routes() {
        assert!(GROUPED[0].contains_route("/hr/payroll"));
        assert!(GROUPED[0].contains_route("/hr/payroll/2024-05"));
        assert!(!GROUPED[0].contains_route("/hr"));
        assert!(GROUPED[0].is_group());
        assert!(!GROUPED[1].is_group());
    }
}
