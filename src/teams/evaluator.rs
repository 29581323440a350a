//! Permission evaluation for project and organisation scopes.

use std::sync::OnceLock;

use super::membership::EffectiveMember;
use super::permission_set::PermissionSet;
use super::permissions::{GlobalRole, OrganisationPermission, ProjectPermission};
use super::traits::Permission;
use crate::config::AccessConfig;

static DEFAULT_POLICY: OnceLock<AccessPolicy> = OnceLock::new();

/// The access rules, bound to a configuration.
///
/// Immutable after construction; share one instance across request handlers.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    config: AccessConfig,
}

impl AccessPolicy {
    pub fn new(config: AccessConfig) -> Self {
        Self { config }
    }

    /// The policy used by the free functions of this module.
    pub fn global() -> &'static Self {
        DEFAULT_POLICY.get_or_init(Self::default)
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Decide whether a project permission is held.
    ///
    /// Returns true if:
    /// - `is_owner` is set, or
    /// - the caller's global role grants `required`, or
    /// - `required` is in `granted`.
    ///
    /// `granted = None` means the caller has no membership at all.
    pub fn has_permission(
        &self,
        required: ProjectPermission,
        granted: Option<&PermissionSet<ProjectPermission>>,
        is_owner: bool,
        role: Option<GlobalRole>,
    ) -> bool {
        let role_grant = role.and_then(|r| self.config.role_grants.project(r));
        evaluate(required, granted, is_owner, role_grant)
    }

    /// Same as [`has_permission`](Self::has_permission) over the organisation
    /// scope.
    pub fn has_org_permission(
        &self,
        required: OrganisationPermission,
        granted: Option<&PermissionSet<OrganisationPermission>>,
        is_owner: bool,
        role: Option<GlobalRole>,
    ) -> bool {
        let role_grant = role.and_then(|r| self.config.role_grants.organisation(r));
        evaluate(required, granted, is_owner, role_grant)
    }

    /// Check a project permission for a resolved membership.
    ///
    /// Pending invitees hold nothing until they accept. Resolve with
    /// [`resolve_effective_member`](super::resolve_effective_member) so that a
    /// pending record never hides an accepted one.
    pub fn member_can(
        &self,
        required: ProjectPermission,
        member: Option<&EffectiveMember<'_>>,
        role: Option<GlobalRole>,
    ) -> bool {
        match member.filter(|m| m.is_accepted()) {
            Some(m) => self.has_permission(required, Some(&m.permissions), m.is_owner, role),
            None => self.has_permission(required, None, false, role),
        }
    }

    /// Check an organisation permission for a resolved membership.
    pub fn member_can_org(
        &self,
        required: OrganisationPermission,
        member: Option<&EffectiveMember<'_>>,
        role: Option<GlobalRole>,
    ) -> bool {
        match member.filter(|m| m.is_accepted()) {
            Some(m) => self.has_org_permission(
                required,
                Some(&m.organisation_permissions),
                m.is_owner,
                role,
            ),
            None => self.has_org_permission(required, None, false, role),
        }
    }
}

fn evaluate<P: Permission>(
    required: P,
    granted: Option<&PermissionSet<P>>,
    is_owner: bool,
    role_grant: Option<&PermissionSet<P>>,
) -> bool {
    if is_owner {
        return true;
    }

    if role_grant.is_some_and(|g| g.contains(required)) {
        return true;
    }

    granted.is_some_and(|g| g.contains(required))
}

/// [`AccessPolicy::has_permission`] under the default configuration.
pub fn has_permission(
    required: ProjectPermission,
    granted: Option<&PermissionSet<ProjectPermission>>,
    is_owner: bool,
    role: Option<GlobalRole>,
) -> bool {
    AccessPolicy::global().has_permission(required, granted, is_owner, role)
}

/// [`AccessPolicy::has_org_permission`] under the default configuration.
pub fn has_org_permission(
    required: OrganisationPermission,
    granted: Option<&PermissionSet<OrganisationPermission>>,
    is_owner: bool,
    role: Option<GlobalRole>,
) -> bool {
    AccessPolicy::global().has_org_permission(required, granted, is_owner, role)
}
