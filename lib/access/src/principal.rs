//! The authenticated principal as reported by the backend.
//!
//! The principal is whatever `GET /auth/me` returns for the current bearer
//! token. The dashboard never constructs one on its own: it is created when
//! that call succeeds and dropped on logout or the next 401.

use chrono::{DateTime, NaiveDateTime};
use pharmaec_core::{RoleId, ShopId, UserId, WarehouseId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::permission::{PermissionCode, PermissionSet};
use crate::role::Role;

/// The signed-in user.
///
/// Unknown fields in the payload are ignored. Older backends omit the
/// permission list or send `null`; both deserialize to an empty set, which
/// leaves non-super-admin principals with only the ungated parts of the
/// dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: UserId,
    email: String,
    full_name: String,
    #[serde(default)]
    phone: Option<String>,
    role: Role,
    #[serde(default)]
    role_id: Option<RoleId>,
    #[serde(default, deserialize_with = "nullable_permissions")]
    permissions: PermissionSet,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    warehouse_id: Option<WarehouseId>,
    #[serde(default)]
    shop_id: Option<ShopId>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    last_login: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<NaiveDateTime>,
}

fn default_active() -> bool {
    true
}

fn nullable_permissions<'de, D>(deserializer: D) -> Result<PermissionSet, D::Error>
where
    D: Deserializer<'de>,
{
    let codes: Option<Vec<PermissionCode>> = Option::deserialize(deserializer)?;
    Ok(codes.map(PermissionSet::from).unwrap_or_default())
}

/// Accepts the backend's naive ISO timestamps as well as RFC 3339 strings.
/// Anything unparseable is dropped rather than failing the whole principal.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .map(|dt| dt.naive_utc())
            .ok()
            .or_else(|| value.parse::<NaiveDateTime>().ok())
    }))
}

impl Principal {
    /// Creates a principal with the required identity fields.
    ///
    /// Mostly useful in tests; production principals come from the backend.
    #[must_use]
    pub fn new(
        id: impl Into<UserId>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        role: impl Into<Role>,
        permissions: PermissionSet,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            full_name: full_name.into(),
            phone: None,
            role: role.into(),
            role_id: None,
            permissions,
            is_active: true,
            warehouse_id: None,
            shop_id: None,
            last_login: None,
            created_at: None,
        }
    }

    /// Assigns the principal to a warehouse.
    #[must_use]
    pub fn with_warehouse(mut self, warehouse_id: impl Into<WarehouseId>) -> Self {
        self.warehouse_id = Some(warehouse_id.into());
        self
    }

    /// Assigns the principal to a shop.
    #[must_use]
    pub fn with_shop(mut self, shop_id: impl Into<ShopId>) -> Self {
        self.shop_id = Some(shop_id.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub fn role_id(&self) -> Option<&RoleId> {
        self.role_id.as_ref()
    }

    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// The warehouse this principal operates in, if assigned to one.
    #[must_use]
    pub fn warehouse_id(&self) -> Option<&WarehouseId> {
        self.warehouse_id.as_ref()
    }

    /// The shop this principal operates in, if assigned to one.
    #[must_use]
    pub fn shop_id(&self) -> Option<&ShopId> {
        self.shop_id.as_ref()
    }

    #[must_use]
    pub fn last_login(&self) -> Option<NaiveDateTime> {
        self.last_login
    }

    #[must_use]
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }

    /// The first word of the full name, used for greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_me_payload_and_ignores_unknown_fields() {
        let json = r#"{
            "id": "0b7a3c52-5d7e-4d1e-9f3c-2a9c1f0e8b11",
            "email": "asha@pharmaec.in",
            "full_name": "Asha Rao",
            "phone": null,
            "role": "cashier",
            "is_active": true,
            "last_login": "2024-05-02T09:15:30.123456",
            "created_at": "2024-01-10T08:00:00Z",
            "permissions": ["billing.create.shop", "billing.view.shop"],
            "shop_id": "9f1c",
            "tenant": "ignored"
        }"#;

        let principal: Principal = serde_json::from_str(json).expect("deserialize");

        assert_eq!(principal.full_name(), "Asha Rao");
        assert_eq!(principal.role().as_str(), "cashier");
        assert!(principal.permissions().has_permission("billing.create.shop"));
        assert_eq!(principal.shop_id().map(ShopId::as_str), Some("9f1c"));
        assert!(principal.warehouse_id().is_none());
        assert!(principal.last_login().is_some());
        assert!(principal.created_at().is_some());
    }

    #[test]
    fn missing_permissions_mean_empty_set() {
        let json = r#"{"id":"u1","email":"a@b.c","full_name":"A","role":"pharmacist"}"#;
        let principal: Principal = serde_json::from_str(json).expect("deserialize");

        assert!(principal.permissions().is_empty());
        assert!(principal.is_active());
        assert!(principal.role_id().is_none());
    }

    #[test]
    fn null_permissions_mean_empty_set() {
        let json = r#"{"id":"u1","email":"a@b.c","full_name":"A","role":"cashier","permissions":null}"#;
        let principal: Principal = serde_json::from_str(json).expect("deserialize");

        assert!(principal.permissions().is_empty());
        assert_eq!(principal.role().as_str(), "cashier");
    }

    #[test]
    fn garbage_timestamps_are_dropped() {
        let json = r#"{"id":"u1","email":"a@b.c","full_name":"A","role":"cashier","last_login":"yesterday"}"#;
        let principal: Principal = serde_json::from_str(json).expect("deserialize");
        assert!(principal.last_login().is_none());
    }

    #[test]
    fn first_name_falls_back_to_full_name() {
        let principal = Principal::new("u1", "a@b.c", "Ravi Kumar", "shop_owner", PermissionSet::empty());
        assert_eq!(principal.first_name(), "Ravi");

        let blank = Principal::new("u2", "a@b.c", "", "shop_owner", PermissionSet::empty());
        assert_eq!(blank.first_name(), "");
    }
}
