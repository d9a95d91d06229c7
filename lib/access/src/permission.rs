//! Permission strings and the predicate library over them.
//!
//! A permission is an opaque dot-separated token such as
//! `"inventory.view.global"`: module, action and an optional scope. Nothing
//! here validates the shape; any string is a permission, and malformed ones
//! simply fail to match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single permission code, compared by exact string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionCode(String);

impl PermissionCode {
    /// Creates a permission code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the module segment (everything before the first dot).
    #[must_use]
    pub fn module(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    /// Returns the third dot-separated segment, if there is one.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.0.split('.').nth(2)
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PermissionCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PermissionCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Breadth of access carried in a permission's third segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every warehouse and shop in the chain.
    Global,
    /// The principal's own warehouse.
    Warehouse,
    /// The principal's own shop.
    Shop,
}

impl Scope {
    /// Parses a scope segment. Unknown segments yield `None`.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "global" => Some(Self::Global),
            "warehouse" => Some(Self::Warehouse),
            "shop" => Some(Self::Shop),
            _ => None,
        }
    }

    /// Returns the wire name of the scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Warehouse => "warehouse",
            Self::Shop => "shop",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The permissions granted to a principal.
///
/// Order is preserved as delivered by the backend because scope lookup
/// returns the first matching entry. Duplicates are dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PermissionCode>", into = "Vec<PermissionCode>")]
pub struct PermissionSet {
    codes: Vec<PermissionCode>,
}

impl PermissionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of distinct permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if no permission is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterates over the granted codes in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionCode> {
        self.codes.iter()
    }

    /// Exact membership.
    #[must_use]
    pub fn has_permission(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c.as_str() == code)
    }

    /// True iff at least one of `codes` is granted. False for an empty list.
    #[must_use]
    pub fn has_any_permission<C: AsRef<str>>(&self, codes: &[C]) -> bool {
        codes.iter().any(|c| self.has_permission(c.as_ref()))
    }

    /// True iff every one of `codes` is granted. Vacuously true for an empty list.
    #[must_use]
    pub fn has_all_permissions<C: AsRef<str>>(&self, codes: &[C]) -> bool {
        codes.iter().all(|c| self.has_permission(c.as_ref()))
    }

    /// True iff any granted code starts with `"<module>."`.
    #[must_use]
    pub fn has_module_access(&self, module: &str) -> bool {
        let prefix = format!("{module}.");
        self.codes.iter().any(|c| c.as_str().starts_with(&prefix))
    }

    /// Scope of the first granted code starting with `prefix`.
    ///
    /// Returns the third dot-separated segment of that code, or `None` when
    /// no code matches or the first match has fewer than three segments.
    /// Later matches are not consulted.
    #[must_use]
    pub fn scope_for_permission(&self, prefix: &str) -> Option<&str> {
        self.codes
            .iter()
            .find(|c| c.as_str().starts_with(prefix))
            .and_then(PermissionCode::scope)
    }
}

impl From<Vec<PermissionCode>> for PermissionSet {
    fn from(codes: Vec<PermissionCode>) -> Self {
        codes.into_iter().collect()
    }
}

impl From<PermissionSet> for Vec<PermissionCode> {
    fn from(set: PermissionSet) -> Self {
        set.codes
    }
}

impl FromIterator<PermissionCode> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionCode>>(iter: I) -> Self {
        let mut codes: Vec<PermissionCode> = Vec::new();
        for code in iter {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Self { codes }
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(PermissionCode::from).collect()
    }
}
