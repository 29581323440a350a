//! Compact permission storage for team members.
//!
//! `PermissionSet` holds the permissions of one scope, with JSON
//! serialization for database storage.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::traits::Permission;

/// A set of permissions of a single scope.
///
/// A `PermissionSet<ProjectPermission>` and a
/// `PermissionSet<OrganisationPermission>` are different types, so the two
/// scopes can never be merged or compared with each other.
///
/// # Example
///
/// ```rust
/// use warden::teams::{PermissionSet, ProjectPermission};
///
/// let mut perms = PermissionSet::new();
/// perms.grant(ProjectPermission::UploadVersion);
/// perms.grant(ProjectPermission::EditDetails);
///
/// assert!(perms.contains(ProjectPermission::UploadVersion));
/// assert!(!perms.contains(ProjectPermission::DeleteProject));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSet<P: Permission> {
    permissions: HashSet<P>,
}

impl<P: Permission> Default for PermissionSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Permission> PermissionSet<P> {
    /// Create an empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Create a set holding every permission of the scope.
    pub fn all() -> Self {
        P::all().iter().copied().collect()
    }

    pub fn grant(&mut self, permission: P) {
        self.permissions.insert(permission);
    }

    pub fn revoke(&mut self, permission: P) {
        self.permissions.remove(&permission);
    }

    pub fn contains(&self, permission: P) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Iterate in the scope's declaration order.
    pub fn iter(&self) -> impl Iterator<Item = P> + '_ {
        P::all()
            .iter()
            .copied()
            .filter(|p| self.permissions.contains(p))
    }

    /// Serialize to JSON for database storage.
    ///
    /// Format: `["upload_version", "edit_details"]`
    pub fn to_json(&self) -> String {
        let list: Vec<&str> = self.iter().map(|p| p.as_str()).collect();
        serde_json::to_string(&list).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Deserialize from JSON.
    ///
    /// Returns None if parsing fails or if any permission is unrecognized.
    pub fn from_json(json: &str) -> Option<Self> {
        let list: Vec<String> = serde_json::from_str(json).ok()?;
        list.iter().map(|s| P::from_str(s)).collect()
    }
}

impl<P: Permission> FromIterator<P> for PermissionSet<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl<P: Permission> Serialize for PermissionSet<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for permission in self.iter() {
            seq.serialize_element(permission.as_str())?;
        }
        seq.end()
    }
}

impl<'de, P: Permission> Deserialize<'de> for PermissionSet<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor<P>(PhantomData<P>);

        impl<'de, P: Permission> Visitor<'de> for SetVisitor<P> {
            type Value = PermissionSet<P>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of permission names")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut set = PermissionSet::new();
                while let Some(name) = seq.next_element::<String>()? {
                    let permission = P::from_str(&name).ok_or_else(|| {
                        serde::de::Error::custom(format!("unknown permission \"{name}\""))
                    })?;
                    set.grant(permission);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor(PhantomData))
    }
}

/// Builder for creating permission sets with a fluent API.
#[must_use]
pub struct PermissionSetBuilder<P: Permission> {
    set: PermissionSet<P>,
}

impl<P: Permission> PermissionSetBuilder<P> {
    pub fn new() -> Self {
        Self {
            set: PermissionSet::new(),
        }
    }

    pub fn grant(mut self, permission: P) -> Self {
        self.set.grant(permission);
        self
    }

    pub fn build(self) -> PermissionSet<P> {
        self.set
    }
}

impl<P: Permission> Default for PermissionSetBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
