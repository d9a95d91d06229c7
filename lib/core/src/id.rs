//! Strongly-typed identifiers for backend entities.
//!
//! The backend assigns every record a 36-character UUID string. The
//! dashboard never generates or inspects these values, so each ID is an
//! opaque string wrapper whose only job is to keep a shop ID from being
//! passed where a warehouse ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a strongly-typed wrapper around a backend-assigned ID.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an ID received from the backend.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a dashboard user (the session principal).
    UserId
);

define_id!(
    /// Unique identifier for a role record.
    RoleId
);

define_id!(
    /// Unique identifier for a warehouse.
    WarehouseId
);

define_id!(
    /// Unique identifier for a medical shop.
    ShopId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_raw_backend_value() {
        let id = WarehouseId::new("0b7e5d1c-6c55-4d43-9c1e-3f0d6d0f6a10");
        assert_eq!(id.to_string(), "0b7e5d1c-6c55-4d43-9c1e-3f0d6d0f6a10");
        assert_eq!(id.as_str(), id.as_ref());
    }

    #[test]
    fn deserializes_from_plain_json_string() {
        let id: ShopId = serde_json::from_str("\"shop-42\"").expect("deserialize");
        assert_eq!(id, ShopId::from("shop-42"));
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"shop-42\"");
    }

    #[test]
    fn ids_hash_by_value() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(UserId::from("a"));
        set.insert(UserId::from("b".to_string()));
        set.insert(UserId::from("a"));

        assert_eq!(set.len(), 2);
    }
}
