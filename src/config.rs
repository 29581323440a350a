//! Configuration types for access resolution.
//!
//! # Example
//!
//! ```rust
//! use warden::config::{AccessConfig, VisibilityConfig};
//! use warden::teams::GlobalRole;
//!
//! // Use defaults
//! let config = AccessConfig::default();
//!
//! // Or customize
//! let config = AccessConfig {
//!     visibility: VisibilityConfig {
//!         staff_roles: vec![GlobalRole::Admin],
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! ```

use std::collections::HashMap;

use crate::teams::{GlobalRole, OrganisationPermission, PermissionSet, ProjectPermission};

/// Main configuration struct.
///
/// Use `AccessConfig::default()` for production defaults.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Permissions granted by a global role, independent of team membership.
    pub role_grants: RoleGrants,

    /// Who may see gated projects.
    pub visibility: VisibilityConfig,

    /// Role label given to newly invited members.
    ///
    /// Default: "Member"
    pub default_member_role: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            role_grants: RoleGrants::default(),
            visibility: VisibilityConfig::default(),
            default_member_role: "Member".to_owned(),
        }
    }
}

impl AccessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only admins bypass the visibility gate and pending invitees can't see
    /// gated projects.
    pub fn strict() -> Self {
        Self {
            visibility: VisibilityConfig {
                staff_roles: vec![GlobalRole::Admin],
                pending_members_see_gated: false,
            },
            ..Self::default()
        }
    }
}

/// Permissions each global role grants on every project and organisation.
///
/// Default: `admin` grants everything in both scopes, other roles nothing.
#[derive(Debug, Clone)]
pub struct RoleGrants {
    project: HashMap<GlobalRole, PermissionSet<ProjectPermission>>,
    organisation: HashMap<GlobalRole, PermissionSet<OrganisationPermission>>,
}

impl Default for RoleGrants {
    fn default() -> Self {
        Self::none()
            .with_project(GlobalRole::Admin, PermissionSet::all())
            .with_organisation(GlobalRole::Admin, PermissionSet::all())
    }
}

impl RoleGrants {
    /// No role grants anything.
    pub fn none() -> Self {
        Self {
            project: HashMap::new(),
            organisation: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_project(
        mut self,
        role: GlobalRole,
        permissions: PermissionSet<ProjectPermission>,
    ) -> Self {
        self.project.insert(role, permissions);
        self
    }

    #[must_use]
    pub fn with_organisation(
        mut self,
        role: GlobalRole,
        permissions: PermissionSet<OrganisationPermission>,
    ) -> Self {
        self.organisation.insert(role, permissions);
        self
    }

    pub fn project(&self, role: GlobalRole) -> Option<&PermissionSet<ProjectPermission>> {
        self.project.get(&role)
    }

    pub fn organisation(
        &self,
        role: GlobalRole,
    ) -> Option<&PermissionSet<OrganisationPermission>> {
        self.organisation.get(&role)
    }
}

/// Configuration for the visibility gate.
#[derive(Debug, Clone)]
pub struct VisibilityConfig {
    /// Global roles that see every project regardless of state.
    ///
    /// Default: admin, moderator
    pub staff_roles: Vec<GlobalRole>,

    /// Whether a pending invitee counts as a member for gated projects.
    ///
    /// Default: true
    pub pending_members_see_gated: bool,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            staff_roles: vec![GlobalRole::Admin, GlobalRole::Moderator],
            pending_members_see_gated: true,
        }
    }
}

impl VisibilityConfig {
    #[inline]
    pub fn is_staff(&self, role: Option<GlobalRole>) -> bool {
        role.is_some_and(|r| self.staff_roles.contains(&r))
    }
}
