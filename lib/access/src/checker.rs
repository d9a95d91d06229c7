//! Permission checks bound to the current principal.

use crate::permission::{PermissionSet, Scope};
use crate::principal::Principal;
use crate::role::Role;

/// Answers permission questions for one principal.
///
/// Every predicate short-circuits for the super-admin role. The override is
/// part of the checker itself; callers cannot opt out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionChecker {
    role: Option<Role>,
    permissions: PermissionSet,
}

impl PermissionChecker {
    /// Builds a checker for `principal`. `None` yields an anonymous checker
    /// with no permissions and no override.
    #[must_use]
    pub fn new(principal: Option<&Principal>) -> Self {
        match principal {
            Some(p) => Self::from_parts(p.role().clone(), p.permissions().clone()),
            None => Self::anonymous(),
        }
    }

    /// Builds a checker from a role and permission set directly.
    #[must_use]
    pub fn from_parts(role: Role, permissions: PermissionSet) -> Self {
        Self {
            role: Some(role),
            permissions,
        }
    }

    /// A checker that denies everything.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The checked role, if any.
    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// The underlying permission set.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_super_admin)
    }

    #[must_use]
    pub fn has_permission(&self, code: &str) -> bool {
        self.is_super_admin() || self.permissions.has_permission(code)
    }

    #[must_use]
    pub fn has_any_permission<C: AsRef<str>>(&self, codes: &[C]) -> bool {
        self.is_super_admin() || self.permissions.has_any_permission(codes)
    }

    #[must_use]
    pub fn has_all_permissions<C: AsRef<str>>(&self, codes: &[C]) -> bool {
        self.is_super_admin() || self.permissions.has_all_permissions(codes)
    }

    #[must_use]
    pub fn has_module_access(&self, module: &str) -> bool {
        self.is_super_admin() || self.permissions.has_module_access(module)
    }

    /// Scope of the first code starting with `prefix`; `"global"` for the
    /// super admin.
    #[must_use]
    pub fn scope_for_permission(&self, prefix: &str) -> Option<&str> {
        if self.is_super_admin() {
            return Some(Scope::Global.as_str());
        }
        self.permissions.scope_for_permission(prefix)
    }

    /// Typed variant of [`Self::scope_for_permission`]. Unknown scope
    /// segments yield `None`.
    #[must_use]
    pub fn scope(&self, prefix: &str) -> Option<Scope> {
        self.scope_for_permission(prefix).and_then(Scope::parse)
    }

    /// Evaluates a declarative gate.
    #[must_use]
    pub fn allows(&self, rule: &GateRule) -> bool {
        match rule {
            GateRule::Permission(code) => self.has_permission(code),
            GateRule::AnyOf(codes) if !codes.is_empty() => self.has_any_permission(codes.as_slice()),
            GateRule::AllOf(codes) if !codes.is_empty() => self.has_all_permissions(codes.as_slice()),
            GateRule::Module(module) => self.has_module_access(module),
            GateRule::AnyOf(_) | GateRule::AllOf(_) | GateRule::Open => true,
        }
    }
}

/// A declarative permission requirement for an inline element.
///
/// Empty code lists are treated as no requirement, which means an
/// `AnyOf(vec![])` gate renders its children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GateRule {
    /// Requires this exact code.
    Permission(String),
    /// Requires at least one of these codes.
    AnyOf(Vec<String>),
    /// Requires every one of these codes.
    AllOf(Vec<String>),
    /// Requires any code in this module.
    Module(String),
    /// No requirement.
    #[default]
    Open,
}

impl GateRule {
    #[must_use]
    pub fn permission(code: impl Into<String>) -> Self {
        Self::Permission(code.into())
    }

    #[must_use]
    pub fn any_of(codes: &[&str]) -> Self {
        Self::AnyOf(codes.iter().map(ToString::to_string).collect())
    }

    #[must_use]
    pub fn all_of(codes: &[&str]) -> Self {
        Self::AllOf(codes.iter().map(ToString::to_string).collect())
    }

    #[must_use]
    pub fn module(module: impl Into<String>) -> Self {
        Self::Module(module.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;

    fn checker(role: &str, codes: &[&str]) -> PermissionChecker {
        PermissionChecker::from_parts(Role::from(role), codes.iter().copied().collect())
    }

    #[test]
    fn super_admin_passes_every_predicate() {
        let admin = checker("super_admin", &[]);

        assert!(admin.has_permission("anything.at.all"));
        assert!(admin.has_any_permission::<&str>(&[]));
        assert!(admin.has_all_permissions(&["x.y", "z.w"]));
        assert!(admin.has_module_access("payroll"));
        assert_eq!(admin.scope_for_permission("inventory.view"), Some("global"));
        assert_eq!(admin.scope("nothing"), Some(Scope::Global));
    }

    #[test]
    fn other_roles_use_their_permission_set() {
        let cashier = checker("cashier", &[codes::BILLING_CREATE_SHOP]);

        assert!(cashier.has_permission(codes::BILLING_CREATE_SHOP));
        assert!(!cashier.has_permission(codes::WAREHOUSES_VIEW));
        assert!(!cashier.has_any_permission::<&str>(&[]));
        assert_eq!(cashier.scope("billing.create"), Some(Scope::Shop));
        assert!(!cashier.is_super_admin());
    }

    #[test]
    fn anonymous_checker_denies() {
        let anon = PermissionChecker::new(None);

        assert!(anon.role().is_none());
        assert!(!anon.has_permission(codes::DASHBOARD_VIEW));
        assert!(!anon.has_module_access("dashboard"));
        assert!(anon.scope_for_permission("dashboard").is_none());
        // Vacuous truth still holds without a principal.
        assert!(anon.has_all_permissions::<&str>(&[]));
    }

    #[test]
    fn built_from_principal() {
        let principal = Principal::new(
            "u1",
            "w@pharmaec.in",
            "Wasim",
            "warehouse_admin",
            [codes::INVENTORY_VIEW_WAREHOUSE].into_iter().collect(),
        );
        let checker = PermissionChecker::new(Some(&principal));

        assert_eq!(checker.role().map(Role::as_str), Some("warehouse_admin"));
        assert!(checker.has_module_access("inventory"));
        assert_eq!(checker.scope("inventory.view"), Some(Scope::Warehouse));
    }

    #[test]
    fn gate_rule_precedence() {
        let pharmacist = checker("pharmacist", &[codes::MEDICINES_VIEW, codes::RACKS_VIEW]);

        assert!(pharmacist.allows(&GateRule::permission(codes::MEDICINES_VIEW)));
        assert!(!pharmacist.allows(&GateRule::permission(codes::MEDICINES_DELETE)));
        assert!(pharmacist.allows(&GateRule::any_of(&[codes::MEDICINES_DELETE, codes::RACKS_VIEW])));
        assert!(!pharmacist.allows(&GateRule::all_of(&[codes::MEDICINES_VIEW, codes::MEDICINES_EDIT])));
        assert!(pharmacist.allows(&GateRule::module("racks")));
        assert!(!pharmacist.allows(&GateRule::module("payroll")));
        assert!(pharmacist.allows(&GateRule::Open));
    }

    #[test]
    fn empty_gate_lists_allow() {
        let nobody = checker("cashier", &[]);

        assert!(nobody.allows(&GateRule::AnyOf(Vec::new())));
        assert!(nobody.allows(&GateRule::AllOf(Vec::new())));
        assert!(nobody.allows(&GateRule::default()));
    }
}
