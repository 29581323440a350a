//! The visibility gate: whether a project may be shown to a viewer at all.

use super::evaluator::AccessPolicy;
use super::membership::resolve_effective_member;
use super::permissions::GlobalRole;
use super::types::{Member, Project, PublishingStatus, Viewer, Visibility};

/// How a viewer may reach a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectAccess {
    /// Must be reported as "not found".
    Denied,
    /// Reachable by exact link; never part of search or listings.
    Direct,
    /// Publicly listed; may appear in search and listings.
    Indexed,
}

impl ProjectAccess {
    pub fn is_accessible(self) -> bool {
        !matches!(self, Self::Denied)
    }

    pub fn is_indexed(self) -> bool {
        matches!(self, Self::Indexed)
    }
}

/// Public reach of a project before looking at the viewer. `None` means the
/// project is gated to members and staff.
fn public_access(visibility: Visibility, status: PublishingStatus) -> Option<ProjectAccess> {
    if !status.is_publicly_approved() {
        return None;
    }

    match visibility {
        Visibility::Listed | Visibility::Archived => Some(ProjectAccess::Indexed),
        Visibility::Unlisted => Some(ProjectAccess::Direct),
        Visibility::Private => None,
    }
}

impl AccessPolicy {
    /// Evaluate the visibility gate.
    ///
    /// Published listed/archived projects are indexed, published unlisted ones
    /// are reachable by link. Private or unpublished projects are reachable
    /// only by members of the project or organisation team (any standing,
    /// not permission gated) and by staff roles.
    pub fn project_access(
        &self,
        visibility: Visibility,
        status: PublishingStatus,
        viewer_user_id: Option<&str>,
        project_members: &[Member],
        org_members: &[Member],
        viewer_role: Option<GlobalRole>,
    ) -> ProjectAccess {
        if let Some(access) = public_access(visibility, status) {
            return access;
        }

        let Some(user_id) = viewer_user_id else {
            return ProjectAccess::Denied;
        };

        let settings = &self.config().visibility;
        if settings.is_staff(viewer_role) {
            return ProjectAccess::Direct;
        }

        let is_member = resolve_effective_member(user_id, project_members, org_members)
            .is_some_and(|m| m.is_accepted() || settings.pending_members_see_gated);

        if is_member {
            ProjectAccess::Direct
        } else {
            log::debug!(
                target: "warden::visibility",
                "msg=\"gated project hidden\", user_id={user_id}, visibility={}, status={}",
                visibility.as_str(),
                status.as_str()
            );
            ProjectAccess::Denied
        }
    }

    pub fn is_project_accessible(
        &self,
        visibility: Visibility,
        status: PublishingStatus,
        viewer_user_id: Option<&str>,
        project_members: &[Member],
        org_members: &[Member],
        viewer_role: Option<GlobalRole>,
    ) -> bool {
        self.project_access(
            visibility,
            status,
            viewer_user_id,
            project_members,
            org_members,
            viewer_role,
        )
        .is_accessible()
    }

    /// [`project_access`](Self::project_access) for a loaded project.
    pub fn access_for(
        &self,
        project: &Project,
        viewer: &Viewer,
        project_members: &[Member],
        org_members: &[Member],
    ) -> ProjectAccess {
        self.project_access(
            project.visibility,
            project.status,
            viewer.user_id(),
            project_members,
            org_members,
            viewer.role,
        )
    }
}

/// [`AccessPolicy::project_access`] under the default configuration.
pub fn project_access(
    visibility: Visibility,
    status: PublishingStatus,
    viewer_user_id: Option<&str>,
    project_members: &[Member],
    org_members: &[Member],
    viewer_role: Option<GlobalRole>,
) -> ProjectAccess {
    AccessPolicy::global().project_access(
        visibility,
        status,
        viewer_user_id,
        project_members,
        org_members,
        viewer_role,
    )
}

/// [`AccessPolicy::is_project_accessible`] under the default configuration.
pub fn is_project_accessible(
    visibility: Visibility,
    status: PublishingStatus,
    viewer_user_id: Option<&str>,
    project_members: &[Member],
    org_members: &[Member],
    viewer_role: Option<GlobalRole>,
) -> bool {
    project_access(
        visibility,
        status,
        viewer_user_id,
        project_members,
        org_members,
        viewer_role,
    )
    .is_accessible()
}
