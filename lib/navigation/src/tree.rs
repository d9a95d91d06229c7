//! The dashboard's sidebar.
//!
//! Paths here must match the routes registered by the dashboard binary.
//! Icons are Material Symbols ligature names.

use pharmaec_access::codes;
use pharmaec_access::role::SUPER_ADMIN;

use crate::entry::{Gate, NavEntry, NavLeaf, route_matches};

const MASTERS_ANY: &[&str] = &[codes::MEDICINES_VIEW, codes::MANUFACTURERS_MANAGE];

const INVENTORY_GROUP_ANY: &[&str] = &[
    codes::INVENTORY_VIEW_GLOBAL,
    codes::INVENTORY_VIEW_WAREHOUSE,
    codes::INVENTORY_VIEW_SHOP,
    codes::INVENTORY_OVERSIGHT,
    codes::INVENTORY_ENTRY_WAREHOUSE,
    codes::DISPATCHES_VIEW_GLOBAL,
    codes::DISPATCHES_VIEW_WAREHOUSE,
    codes::DISPATCHES_VIEW_SHOP,
];

const SALES_ANY: &[&str] = &[
    codes::BILLING_VIEW_SHOP,
    codes::BILLING_CREATE_SHOP,
    codes::RETURNS_VIEW_SHOP,
    codes::RETURNS_CREATE_SHOP,
];

const HR_ANY: &[&str] = &[
    codes::EMPLOYEES_VIEW_GLOBAL,
    codes::EMPLOYEES_VIEW_WAREHOUSE,
    codes::EMPLOYEES_VIEW_SHOP,
    codes::ATTENDANCE_MANAGE_WAREHOUSE,
    codes::ATTENDANCE_MANAGE_SHOP,
    codes::SALARY_MANAGE_WAREHOUSE,
    codes::SALARY_MANAGE_SHOP,
];

/// The full sidebar, top to bottom.
pub static SIDEBAR: &[NavEntry] = &[
    NavEntry {
        path: "/",
        label: "Dashboard",
        icon: "dashboard",
        gate: Gate::Universal,
        children: &[],
    },
    NavEntry {
        path: "/warehouses",
        label: "Warehouses",
        icon: "warehouse",
        gate: Gate::PermissionGated(&[codes::WAREHOUSES_VIEW]),
        children: &[],
    },
    NavEntry {
        path: "/shops",
        label: "Medical Shops",
        icon: "storefront",
        gate: Gate::PermissionGated(&[codes::SHOPS_VIEW]),
        children: &[],
    },
    NavEntry {
        path: "/masters",
        label: "Medicines & Masters",
        icon: "medication",
        gate: Gate::PermissionGated(MASTERS_ANY),
        children: &[
            NavLeaf {
                path: "/medicines",
                label: "Medicines",
                icon: "pill",
                gate: Gate::PermissionGated(&[codes::MEDICINES_VIEW]),
            },
            NavLeaf {
                path: "/manufacturers",
                label: "Manufacturers",
                icon: "factory",
                gate: Gate::PermissionGated(&[codes::MANUFACTURERS_MANAGE]),
            },
        ],
    },
    NavEntry {
        path: "/inventory",
        label: "Inventory",
        icon: "inventory_2",
        gate: Gate::PermissionGated(INVENTORY_GROUP_ANY),
        children: &[
            NavLeaf {
                path: "/inventory/stock",
                label: "Stock Overview",
                icon: "inventory",
                gate: Gate::PermissionGated(codes::INVENTORY_VIEW_ANY),
            },
            NavLeaf {
                path: "/inventory/entry",
                label: "Stock Entry",
                icon: "add_box",
                gate: Gate::RoleExcluded {
                    role: SUPER_ADMIN,
                    codes: &[codes::INVENTORY_ENTRY_WAREHOUSE],
                },
            },
            NavLeaf {
                path: "/inventory/movements",
                label: "Movements",
                icon: "swap_horiz",
                gate: Gate::PermissionGated(codes::INVENTORY_VIEW_ANY),
            },
            NavLeaf {
                path: "/dispatches",
                label: "Dispatches",
                icon: "local_shipping",
                gate: Gate::PermissionGated(codes::DISPATCHES_VIEW_ANY),
            },
        ],
    },
    NavEntry {
        path: "/sales",
        label: "Sales",
        icon: "point_of_sale",
        gate: Gate::PermissionGated(SALES_ANY),
        children: &[
            NavLeaf {
                path: "/sales/pos",
                label: "POS Billing",
                icon: "shopping_cart",
                gate: Gate::PermissionGated(&[codes::BILLING_CREATE_SHOP]),
            },
            NavLeaf {
                path: "/sales/invoices",
                label: "Invoices",
                icon: "receipt_long",
                gate: Gate::PermissionGated(&[codes::BILLING_VIEW_SHOP]),
            },
            NavLeaf {
                path: "/sales/returns",
                label: "Returns",
                icon: "assignment_return",
                gate: Gate::PermissionGated(&[codes::RETURNS_VIEW_SHOP, codes::RETURNS_CREATE_SHOP]),
            },
        ],
    },
    NavEntry {
        path: "/hr",
        label: "HR",
        icon: "badge",
        gate: Gate::PermissionGated(HR_ANY),
        children: &[
            NavLeaf {
                path: "/hr/employees",
                label: "Employees",
                icon: "group",
                gate: Gate::PermissionGated(codes::EMPLOYEES_VIEW_ANY),
            },
            NavLeaf {
                path: "/hr/attendance",
                label: "Attendance",
                icon: "event_available",
                gate: Gate::PermissionGated(&[
                    codes::ATTENDANCE_MANAGE_WAREHOUSE,
                    codes::ATTENDANCE_MANAGE_SHOP,
                ]),
            },
            NavLeaf {
                path: "/hr/payroll",
                label: "Payroll",
                icon: "payments",
                gate: Gate::PermissionGated(&[
                    codes::SALARY_MANAGE_WAREHOUSE,
                    codes::SALARY_MANAGE_SHOP,
                ]),
            },
        ],
    },
    NavEntry {
        path: "/reports",
        label: "Reports",
        icon: "bar_chart",
        gate: Gate::PermissionGated(codes::REPORTS_VIEW_ANY),
        children: &[],
    },
    NavEntry {
        path: "/settings",
        label: "Settings",
        icon: "settings",
        gate: Gate::PermissionGated(&[codes::SETTINGS_VIEW, codes::SETTINGS_MANAGE]),
        children: &[
            NavLeaf {
                path: "/settings/application",
                label: "Application",
                icon: "tune",
                gate: Gate::PermissionGated(&[codes::SETTINGS_VIEW]),
            },
            NavLeaf {
                path: "/settings/system",
                label: "System",
                icon: "admin_panel_settings",
                gate: Gate::PermissionGated(&[codes::SETTINGS_MANAGE]),
            },
        ],
    },
];

/// Label of the most specific sidebar entry matching `active_path`, used as
/// the page title.
#[must_use]
pub fn title_for(active_path: &str) -> Option<&'static str> {
    let leaves = SIDEBAR
        .iter()
        .flat_map(|entry| entry.children.iter().map(|leaf| (leaf.path, leaf.label)));
    let links = SIDEBAR
        .iter()
        .filter(|entry| !entry.is_group())
        .map(|entry| (entry.path, entry.label));

    leaves
        .chain(links)
        .filter(|(path, _)| route_matches(active_path, path))
        .max_by_key(|(path, _)| path.len())
        .map(|(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::visible_entries;
    use pharmaec_access::{PermissionChecker, PermissionSet, Role};

    fn labels(checker: &PermissionChecker) -> Vec<&'static str> {
        visible_entries(SIDEBAR, checker)
            .into_iter()
            .flat_map(|v| {
                std::iter::once(v.entry.label).chain(v.children.into_iter().map(|leaf| leaf.label))
            })
            .collect()
    }

    #[test]
    fn cashier_sees_pos_billing_but_not_warehouses() {
        let cashier = PermissionChecker::from_parts(
            Role::from("cashier"),
            [codes::BILLING_CREATE_SHOP].into_iter().collect(),
        );

        let visible = labels(&cashier);

        assert!(visible.contains(&"POS Billing"));
        assert!(visible.contains(&"Sales"));
        assert!(visible.contains(&"Dashboard"));
        assert!(!visible.contains(&"Warehouses"));
        assert!(!visible.contains(&"Invoices"));
    }

    #[test]
    fn super_admin_never_sees_stock_entry() {
        let admin = PermissionChecker::from_parts(Role::super_admin(), PermissionSet::empty());
        let visible = labels(&admin);

        assert!(!visible.contains(&"Stock Entry"));
        assert!(visible.contains(&"Stock Overview"));
        assert!(visible.contains(&"Payroll"));
        assert!(visible.contains(&"System"));

        let with_code = PermissionChecker::from_parts(
            Role::super_admin(),
            [codes::INVENTORY_ENTRY_WAREHOUSE].into_iter().collect(),
        );
        assert!(!labels(&with_code).contains(&"Stock Entry"));
    }

    #[test]
    fn warehouse_admin_sees_stock_entry() {
        let admin = PermissionChecker::from_parts(
            Role::from("warehouse_admin"),
            [codes::INVENTORY_ENTRY_WAREHOUSE].into_iter().collect(),
        );
        let visible = labels(&admin);

        assert!(visible.contains(&"Inventory"));
        assert!(visible.contains(&"Stock Entry"));
        assert!(!visible.contains(&"Stock Overview"));
    }

    #[test]
    fn paths_are_unique() {
        let mut paths: Vec<&str> = SIDEBAR
            .iter()
            .flat_map(|e| std::iter::once(e.path).chain(e.children.iter().map(|c| c.path)))
            .collect();
        let total = paths.len();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), total);
    }

    #[test]
    fn titles_prefer_the_most_specific_entry() {
        assert_eq!(title_for("/"), Some("Dashboard"));
        assert_eq!(title_for("/inventory/entry"), Some("Stock Entry"));
        assert_eq!(title_for("/warehouses/abc/edit"), Some("Warehouses"));
        assert_eq!(title_for("/login"), None);
    }
}
