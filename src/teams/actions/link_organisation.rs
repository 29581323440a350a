use chrono::Utc;

use super::context::{deny, Caller, MembershipLoader, OrganisationContext};
use crate::events::{dispatch, TeamEvent};
use crate::teams::repository::{
    CreateMember, MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository,
};
use crate::teams::{AccessPolicy, OrganisationPermission, Project, Viewer};
use crate::AccessError;

/// Role of the owner record created when a project leaves its organisation.
pub const INHERITED_OWNER_ROLE: &str = "Inherited Owner";

/// Load the organisation and check the caller holds `required` on it.
async fn authorize<T, M, P, O>(
    loader: &MembershipLoader<T, M, P, O>,
    policy: &AccessPolicy,
    organisation_id: &str,
    required: OrganisationPermission,
    denial: &str,
    caller: &Caller<'_>,
) -> Result<OrganisationContext, AccessError>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    let ctx = loader.load_organisation(organisation_id).await?;
    let member = ctx.resolve(caller.user_id);

    if member.is_none() && !policy.config().visibility.is_staff(caller.role) {
        return Err(deny(Some(caller.user_id), organisation_id, AccessError::NotFound).await);
    }

    if !policy.member_can_org(required, member.as_ref(), caller.role) {
        let err = AccessError::Unauthorized(denial.to_owned());
        return Err(deny(Some(caller.user_id), organisation_id, err).await);
    }

    Ok(ctx)
}

/// Action to move a project into an organisation.
///
/// The caller needs `add_project` on the organisation and must own the
/// project. A project belongs to at most one organisation.
///
/// The project's own team is emptied: from then on the organisation team
/// governs the project.
pub struct AddProjectToOrganisationAction<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    loader: MembershipLoader<T, M, P, O>,
    policy: AccessPolicy,
}

impl<T, M, P, O> AddProjectToOrganisationAction<T, M, P, O>
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
        tracing::instrument(name = "add_project_to_organisation", skip_all, err)
    )]
    pub async fn execute(
        &self,
        organisation_id: &str,
        project_id: &str,
        viewer: &Viewer,
    ) -> Result<Project, AccessError> {
        let caller = Caller::from_viewer(viewer)?;
        let org = authorize(
            &self.loader,
            &self.policy,
            organisation_id,
            OrganisationPermission::AddProject,
            "You don't have permission to add projects to this organization",
            &caller,
        )
        .await?;

        let project_ctx = self.loader.load_project(project_id).await?;
        let access = self.policy.access_for(
            &project_ctx.project,
            viewer,
            &project_ctx.members,
            &project_ctx.org_members,
        );
        if !access.is_accessible() {
            return Err(deny(Some(caller.user_id), project_id, AccessError::NotFound).await);
        }

        if let Some(current) = &project_ctx.project.organisation_id {
            let message = if *current == org.organisation.id {
                "The specified project is already part of this organization"
            } else {
                "The specified project is already owned by an organization"
            };
            return Err(AccessError::InvalidRequest(message.to_owned()));
        }

        let owns_project = project_ctx
            .resolve(caller.user_id)
            .is_some_and(|m| m.is_owner);
        if !owns_project {
            let err = AccessError::Unauthorized(
                "You need to be an owner of a project to add it to an organization".to_owned(),
            );
            return Err(deny(Some(caller.user_id), project_id, err).await);
        }

        self.loader
            .members()
            .delete_by_team(&project_ctx.project.team_id)
            .await?;

        let project = self
            .loader
            .projects()
            .set_organisation(project_id, Some(&org.organisation.id))
            .await?;

        log::info!(
            target: "warden::organisations",
            "msg=\"project added to organisation\", project_id={project_id}, organisation_id={}, by={}",
            org.organisation.id,
            caller.user_id
        );

        dispatch(TeamEvent::ProjectAddedToOrganisation {
            project_id: project.id.clone(),
            organisation_id: org.organisation.id.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(project)
    }
}

/// Action to take a project out of its organisation.
///
/// The project team is reset to a single accepted owner record for the
/// caller, with the role [`INHERITED_OWNER_ROLE`]. Organisation members lose
/// their inherited access.
pub struct RemoveProjectFromOrganisationAction<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    loader: MembershipLoader<T, M, P, O>,
    policy: AccessPolicy,
}

impl<T, M, P, O> RemoveProjectFromOrganisationAction<T, M, P, O>
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
        tracing::instrument(name = "remove_project_from_organisation", skip_all, err)
    )]
    pub async fn execute(
        &self,
        organisation_id: &str,
        project_id: &str,
        viewer: &Viewer,
    ) -> Result<Project, AccessError> {
        let caller = Caller::from_viewer(viewer)?;
        let org = authorize(
            &self.loader,
            &self.policy,
            organisation_id,
            OrganisationPermission::RemoveProject,
            "You don't have permission to remove projects from this organization",
            &caller,
        )
        .await?;

        let current = self
            .loader
            .projects()
            .find_by_id(project_id)
            .await?
            .ok_or(AccessError::NotFound)?;
        if current.organisation_id.as_deref() != Some(org.organisation.id.as_str()) {
            return Err(AccessError::InvalidRequest(
                "The specified project is not part of this organization".to_owned(),
            ));
        }

        // reset the project team
        let members = self.loader.members();
        members.delete_by_team(&current.team_id).await?;
        members
            .create_owner(CreateMember {
                team_id: current.team_id.clone(),
                user_id: caller.user_id.to_owned(),
                role: INHERITED_OWNER_ROLE.to_owned(),
            })
            .await?;

        let project = self
            .loader
            .projects()
            .set_organisation(project_id, None)
            .await?;

        log::info!(
            target: "warden::organisations",
            "msg=\"project removed from organisation\", project_id={project_id}, organisation_id={}, by={}",
            org.organisation.id,
            caller.user_id
        );

        dispatch(TeamEvent::ProjectRemovedFromOrganisation {
            project_id: project.id.clone(),
            organisation_id: org.organisation.id.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::actions::testing::Fixture;
    use crate::teams::actions::{TransferOwnershipAction, ViewProjectAction};
    use crate::teams::{GlobalRole, Permission, ProjectPermission, PublishingStatus, Visibility};

    #[tokio::test]
    async fn test_owner_of_both_adds_project() {
        let fx = Fixture::new();
        fx.organisation("o1", "p1-owner");
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = AddProjectToOrganisationAction::new(fx.loader());
        let project = action
            .execute("o1", "p1", &Viewer::user("p1-owner", GlobalRole::User))
            .await
            .unwrap();

        assert_eq!(project.organisation_id.as_deref(), Some("o1"));
        assert!(fx.members.find_by_team("p1-team").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_former_project_team_loses_access_after_add() {
        let fx = Fixture::new();
        fx.organisation("o1", "p1-owner");
        fx.project("p1", Visibility::Private, PublishingStatus::Draft, None);
        fx.member("m2", "p1-team", "u2", ProjectPermission::all(), &[]);

        AddProjectToOrganisationAction::new(fx.loader())
            .execute("o1", "p1", &Viewer::user("p1-owner", GlobalRole::User))
            .await
            .unwrap();

        let view = ViewProjectAction::new(fx.loader());
        assert_eq!(
            view.execute("p1", &Viewer::user("u2", GlobalRole::User))
                .await
                .unwrap_err(),
            AccessError::NotFound
        );

        // the former owner now reaches the project through the organisation
        let seen = view
            .execute("p1", &Viewer::user("p1-owner", GlobalRole::User))
            .await
            .unwrap();
        assert_eq!(seen.member.unwrap().team_id, "o1-team");
        assert!(seen.is_owner);
    }

    #[tokio::test]
    async fn test_add_requires_project_ownership() {
        let fx = Fixture::new();
        fx.organisation("o1", "org-owner");
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = AddProjectToOrganisationAction::new(fx.loader());
        let result = action
            .execute("o1", "p1", &Viewer::user("org-owner", GlobalRole::User))
            .await;

        assert!(matches!(result.unwrap_err(), AccessError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_add_requires_org_permission() {
        let fx = Fixture::new();
        fx.organisation("o1", "org-owner");
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);
        fx.member("om", "o1-team", "p1-owner", &[], &[]);

        let action = AddProjectToOrganisationAction::new(fx.loader());
        let result = action
            .execute("o1", "p1", &Viewer::user("p1-owner", GlobalRole::User))
            .await;
        assert!(matches!(result.unwrap_err(), AccessError::Unauthorized(_)));

        fx.members.members.write().unwrap().retain(|m| m.id != "om");
        fx.member("om", "o1-team", "p1-owner", &[], &[OrganisationPermission::AddProject]);
        let result = action
            .execute("o1", "p1", &Viewer::user("p1-owner", GlobalRole::User))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_add_project_already_in_organisation() {
        let fx = Fixture::new();
        fx.organisation("o1", "p1-owner");
        fx.organisation("o2", "p1-owner");
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, Some("o2"));

        let action = AddProjectToOrganisationAction::new(fx.loader());
        let result = action
            .execute("o1", "p1", &Viewer::user("p1-owner", GlobalRole::User))
            .await;

        assert!(matches!(result.unwrap_err(), AccessError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_non_member_gets_not_found() {
        let fx = Fixture::new();
        fx.organisation("o1", "org-owner");
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = AddProjectToOrganisationAction::new(fx.loader());
        let result = action
            .execute("o1", "p1", &Viewer::user("p1-owner", GlobalRole::User))
            .await;

        assert_eq!(result.unwrap_err(), AccessError::NotFound);
    }

    #[tokio::test]
    async fn test_remove_project() {
        let fx = Fixture::new();
        fx.organisation("o1", "org-owner");
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, Some("o1"));

        let action = RemoveProjectFromOrganisationAction::new(fx.loader());
        let project = action
            .execute("o1", "p1", &Viewer::user("org-owner", GlobalRole::User))
            .await
            .unwrap();

        assert!(project.organisation_id.is_none());

        let members = fx.members.find_by_team("p1-team").await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, "org-owner");
        assert_eq!(members[0].role, INHERITED_OWNER_ROLE);
        assert!(members[0].is_owner);
        assert!(members[0].is_accepted());
        assert!(members[0].permissions.is_empty());
    }

    #[tokio::test]
    async fn test_removed_project_without_team_owner_can_be_transferred() {
        let fx = Fixture::new();
        fx.organisation("o1", "org-owner");
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, Some("o1"));
        // created inside the organisation: no project-team records
        fx.members.members.write().unwrap().retain(|m| m.team_id != "p1-team");
        fx.member("om", "o1-team", "u2", &[], &[OrganisationPermission::RemoveProject]);

        RemoveProjectFromOrganisationAction::new(fx.loader())
            .execute("o1", "p1", &Viewer::user("u2", GlobalRole::User))
            .await
            .unwrap();

        let owner = fx
            .members
            .find_by_team_and_user("p1-team", "u2")
            .await
            .unwrap()
            .unwrap();
        assert!(owner.is_owner);

        fx.member("m3", "p1-team", "u3", &[], &[]);
        TransferOwnershipAction::new(fx.loader())
            .execute("p1-team", "m3", &Viewer::user("u2", GlobalRole::User))
            .await
            .unwrap();

        let members = fx.members.find_by_team("p1-team").await.unwrap();
        let owners: Vec<&str> = members
            .iter()
            .filter(|m| m.is_owner)
            .map(|m| m.user_id.as_str())
            .collect();
        assert_eq!(owners, vec!["u3"]);
    }

    #[tokio::test]
    async fn test_remove_project_of_other_organisation() {
        let fx = Fixture::new();
        fx.organisation("o1", "org-owner");
        fx.organisation("o2", "other-owner");
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, Some("o2"));

        let action = RemoveProjectFromOrganisationAction::new(fx.loader());
        let result = action
            .execute("o1", "p1", &Viewer::user("org-owner", GlobalRole::User))
            .await;

        assert!(matches!(result.unwrap_err(), AccessError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_org_member_loses_access_after_removal() {
        let fx = Fixture::new();
        fx.organisation("o1", "org-owner");
        fx.project("p1", Visibility::Private, PublishingStatus::Draft, Some("o1"));
        fx.member("om", "o1-team", "u2", &[], &[]);

        let view = ViewProjectAction::new(fx.loader());
        let viewer = Viewer::user("u2", GlobalRole::User);
        assert!(view.execute("p1", &viewer).await.is_ok());

        RemoveProjectFromOrganisationAction::new(fx.loader())
            .execute("o1", "p1", &Viewer::user("org-owner", GlobalRole::User))
            .await
            .unwrap();

        assert_eq!(
            view.execute("p1", &viewer).await.unwrap_err(),
            AccessError::NotFound
        );

        // the remover now owns the project directly
        let owner = view
            .execute("p1", &Viewer::user("org-owner", GlobalRole::User))
            .await
            .unwrap();
        assert_eq!(owner.member.unwrap().team_id, "p1-team");
        assert!(owner.is_owner);
    }
}
