//! Permission code catalogue.
//!
//! Every code the dashboard gates on, named after the backend's permission
//! table. Using the constants instead of literals keeps the sidebar, the
//! screens and the backend seed data spelling things the same way.

// Dashboard
pub const DASHBOARD_VIEW: &str = "dashboard.view";

// Users and roles
pub const USERS_VIEW: &str = "users.view";
pub const USERS_CREATE: &str = "users.create";
pub const USERS_EDIT: &str = "users.edit";
pub const USERS_DELETE: &str = "users.delete";
pub const ROLES_VIEW: &str = "roles.view";
pub const ROLES_MANAGE: &str = "roles.manage";

// Warehouses
pub const WAREHOUSES_VIEW: &str = "warehouses.view";
pub const WAREHOUSES_CREATE: &str = "warehouses.create";
pub const WAREHOUSES_EDIT: &str = "warehouses.edit";
pub const WAREHOUSES_DELETE: &str = "warehouses.delete";

// Shops
pub const SHOPS_VIEW: &str = "shops.view";
pub const SHOPS_CREATE: &str = "shops.create";
pub const SHOPS_EDIT: &str = "shops.edit";
pub const SHOPS_DELETE: &str = "shops.delete";

// Medicines
pub const MEDICINES_VIEW: &str = "medicines.view";
pub const MEDICINES_CREATE: &str = "medicines.create";
pub const MEDICINES_EDIT: &str = "medicines.edit";
pub const MEDICINES_DELETE: &str = "medicines.delete";

// Master data
pub const CATEGORIES_MANAGE: &str = "categories.manage";
pub const UNITS_MANAGE: &str = "units.manage";
pub const HSN_MANAGE: &str = "hsn.manage";
pub const GST_MANAGE: &str = "gst.manage";
pub const MANUFACTURERS_MANAGE: &str = "manufacturers.manage";

// Inventory
pub const INVENTORY_VIEW_GLOBAL: &str = "inventory.view.global";
pub const INVENTORY_VIEW_WAREHOUSE: &str = "inventory.view.warehouse";
pub const INVENTORY_VIEW_SHOP: &str = "inventory.view.shop";
pub const INVENTORY_OVERSIGHT: &str = "inventory.oversight";
pub const INVENTORY_ADJUST_WAREHOUSE: &str = "inventory.adjust.warehouse";
pub const INVENTORY_ADJUST_SHOP: &str = "inventory.adjust.shop";
pub const INVENTORY_ENTRY_WAREHOUSE: &str = "inventory.entry.warehouse";

// Racks
pub const RACKS_VIEW: &str = "racks.view";
pub const RACKS_MANAGE_WAREHOUSE: &str = "racks.manage.warehouse";

// Purchase requests
pub const PURCHASE_REQUESTS_VIEW_GLOBAL: &str = "purchase_requests.view.global";
pub const PURCHASE_REQUESTS_VIEW_WAREHOUSE: &str = "purchase_requests.view.warehouse";
pub const PURCHASE_REQUESTS_VIEW_SHOP: &str = "purchase_requests.view.shop";
pub const PURCHASE_REQUESTS_CREATE_SHOP: &str = "purchase_requests.create.shop";
pub const PURCHASE_REQUESTS_APPROVE_WAREHOUSE: &str = "purchase_requests.approve.warehouse";

// Dispatches
pub const DISPATCHES_VIEW_GLOBAL: &str = "dispatches.view.global";
pub const DISPATCHES_VIEW_WAREHOUSE: &str = "dispatches.view.warehouse";
pub const DISPATCHES_VIEW_SHOP: &str = "dispatches.view.shop";
pub const DISPATCHES_CREATE_WAREHOUSE: &str = "dispatches.create.warehouse";

// Billing
pub const BILLING_VIEW_SHOP: &str = "billing.view.shop";
pub const BILLING_CREATE_SHOP: &str = "billing.create.shop";
pub const BILLING_VOID_SHOP: &str = "billing.void.shop";

// Returns
pub const RETURNS_VIEW_SHOP: &str = "returns.view.shop";
pub const RETURNS_CREATE_SHOP: &str = "returns.create.shop";

// Customers
pub const CUSTOMERS_VIEW: &str = "customers.view";
pub const CUSTOMERS_VIEW_SHOP: &str = "customers.view.shop";
pub const CUSTOMERS_MANAGE_SHOP: &str = "customers.manage.shop";

// Employees, attendance and payroll
pub const EMPLOYEES_VIEW_GLOBAL: &str = "employees.view.global";
pub const EMPLOYEES_VIEW_WAREHOUSE: &str = "employees.view.warehouse";
pub const EMPLOYEES_VIEW_SHOP: &str = "employees.view.shop";
pub const EMPLOYEES_MANAGE_WAREHOUSE: &str = "employees.manage.warehouse";
pub const EMPLOYEES_MANAGE_SHOP: &str = "employees.manage.shop";
pub const ATTENDANCE_MANAGE_WAREHOUSE: &str = "attendance.manage.warehouse";
pub const ATTENDANCE_MANAGE_SHOP: &str = "attendance.manage.shop";
pub const SALARY_MANAGE_WAREHOUSE: &str = "salary.manage.warehouse";
pub const SALARY_MANAGE_SHOP: &str = "salary.manage.shop";

// Reports
pub const REPORTS_VIEW_GLOBAL: &str = "reports.view.global";
pub const REPORTS_VIEW_WAREHOUSE: &str = "reports.view.warehouse";
pub const REPORTS_VIEW_SHOP: &str = "reports.view.shop";
pub const REPORTS_EXPORT: &str = "reports.export";

// Settings
pub const SETTINGS_VIEW: &str = "settings.view";
pub const SETTINGS_MANAGE: &str = "settings.manage";

// Audit
pub const AUDIT_VIEW: &str = "audit.view";
pub const LOGIN_ACTIVITY_VIEW: &str = "login_activity.view";

// Notifications
pub const NOTIFICATIONS_VIEW: &str = "notifications.view";

/// Any of these grants a view of stock levels.
pub const INVENTORY_VIEW_ANY: &[&str] = &[
    INVENTORY_VIEW_GLOBAL,
    INVENTORY_VIEW_WAREHOUSE,
    INVENTORY_VIEW_SHOP,
    INVENTORY_OVERSIGHT,
];

/// Any of these grants a view of dispatches.
pub const DISPATCHES_VIEW_ANY: &[&str] = &[
    DISPATCHES_VIEW_GLOBAL,
    DISPATCHES_VIEW_WAREHOUSE,
    DISPATCHES_VIEW_SHOP,
];

/// Any of these grants a view of the employee directory.
pub const EMPLOYEES_VIEW_ANY: &[&str] = &[
    EMPLOYEES_VIEW_GLOBAL,
    EMPLOYEES_VIEW_WAREHOUSE,
    EMPLOYEES_VIEW_SHOP,
];

/// Any of these grants a view of reports.
pub const REPORTS_VIEW_ANY: &[&str] = &[
    REPORTS_VIEW_GLOBAL,
    REPORTS_VIEW_WAREHOUSE,
    REPORTS_VIEW_SHOP,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionCode;

    #[test]
    fn grouped_view_codes_share_a_module() {
        for (group, module) in [
            (INVENTORY_VIEW_ANY, "inventory"),
            (DISPATCHES_VIEW_ANY, "dispatches"),
            (EMPLOYEES_VIEW_ANY, "employees"),
            (REPORTS_VIEW_ANY, "reports"),
        ] {
            for code in group {
                assert_eq!(PermissionCode::from(*code).module(), module, "{code}");
            }
        }
    }
}
