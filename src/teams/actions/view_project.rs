use super::context::{deny, MembershipLoader};
use crate::teams::repository::{
    MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository,
};
use crate::teams::{AccessPolicy, Member, Project, ProjectAccess, Viewer};
use crate::AccessError;

/// A project as seen by one viewer.
#[derive(Debug, Clone)]
pub struct ProjectView {
    pub project: Project,
    pub access: ProjectAccess,
    /// The viewer's own membership, if any.
    pub member: Option<Member>,
    /// Whether the viewer is effectively the owner.
    pub is_owner: bool,
}

/// Action to fetch a project for a viewer.
///
/// Hidden projects are reported as `AccessError::NotFound`, the same as
/// missing ones, so their existence isn't confirmed to non-members.
pub struct ViewProjectAction<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    loader: MembershipLoader<T, M, P, O>,
    policy: AccessPolicy,
}

impl<T, M, P, O> ViewProjectAction<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    pub fn new(loader: MembershipLoader<T, M, P, O>) -> Self {
        Self::with_policy(loader, AccessPolicy::default())
    }

    pub fn with_policy(loader: MembershipLoader<T, M, P, O>, policy: AccessPolicy) -> Self {
        Self { loader, policy }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "view_project", skip_all, err)
    )]
    pub async fn execute(
        &self,
        project_id: &str,
        viewer: &Viewer,
    ) -> Result<ProjectView, AccessError> {
        let ctx = self.loader.load_project(project_id).await?;

        let access =
            self.policy
                .access_for(&ctx.project, viewer, &ctx.members, &ctx.org_members);
        if !access.is_accessible() {
            return Err(deny(viewer.user_id(), project_id, AccessError::NotFound).await);
        }

        let effective = viewer.user_id().and_then(|user_id| ctx.resolve(user_id));
        let is_owner = effective.is_some_and(|m| m.is_owner);
        let member = effective.map(|m| m.member.clone());

        Ok(ProjectView {
            project: ctx.project,
            access,
            member,
            is_owner,
        })
    }
}
