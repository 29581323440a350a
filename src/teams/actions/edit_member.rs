use chrono::Utc;

use super::context::{deny, Caller, MembershipLoader, TeamAbility, TeamContext};
use crate::events::{dispatch, TeamEvent};
use crate::teams::repository::{
    MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository, UpdateMember,
};
use crate::teams::{
    AccessPolicy, Member, OrganisationPermission, PermissionSet, ProjectPermission, Viewer,
};
use crate::validators::validate_role_label;
use crate::AccessError;

/// Changes to apply to one member. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct EditMemberInput {
    pub team_id: String,
    pub member_id: String,
    pub role: Option<String>,
    pub permissions: Option<PermissionSet<ProjectPermission>>,
    pub organisation_permissions: Option<PermissionSet<OrganisationPermission>>,
}

/// Action to change a member's role label or permission sets.
///
/// Editors can only hand out permissions they hold themselves, and the
/// owner's permission sets are fixed.
pub struct EditMemberAction<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    loader: MembershipLoader<T, M, P, O>,
    policy: AccessPolicy,
}

impl<T, M, P, O> EditMemberAction<T, M, P, O>
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

    /// # Returns
    ///
    /// - `Ok(member)` - the updated record
    /// - `Err(AccessError::NotFound)` - team or member missing, or editor unknown to the team
    /// - `Err(AccessError::Unauthorized(_))` - editor lacks `edit_member`, or
    ///   tried to grant a permission they don't hold
    /// - `Err(AccessError::InvalidRequest(_))` - permissions changed on the owner
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "edit_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        input: EditMemberInput,
        editor: &Viewer,
    ) -> Result<Member, AccessError> {
        let caller = Caller::from_viewer(editor)?;
        if let Some(role) = &input.role {
            validate_role_label(role)?;
        }

        let ctx = self.loader.load_team(&input.team_id).await?;

        if !ctx.is_known_to(&self.policy, &caller) {
            return Err(deny(Some(caller.user_id), &input.team_id, AccessError::NotFound).await);
        }

        if !ctx.allows(&self.policy, TeamAbility::EditMember, &caller) {
            let err = TeamAbility::EditMember.denied();
            return Err(deny(Some(caller.user_id), &input.team_id, err).await);
        }

        let target = ctx.member(&input.member_id).ok_or(AccessError::NotFound)?;

        let changes_permissions =
            input.permissions.is_some() || input.organisation_permissions.is_some();
        if target.is_owner && changes_permissions {
            return Err(AccessError::InvalidRequest(
                "The owner's permissions can't be changed".to_owned(),
            ));
        }

        if !self.may_grant(&ctx, &caller, &input) {
            let err = AccessError::Unauthorized(
                "You can't grant permissions you don't hold".to_owned(),
            );
            return Err(deny(Some(caller.user_id), &input.team_id, err).await);
        }

        let member = self
            .loader
            .members()
            .update(
                &target.id,
                UpdateMember {
                    role: input.role.map(|r| r.trim().to_owned()),
                    permissions: input.permissions,
                    organisation_permissions: input.organisation_permissions,
                },
            )
            .await?;

        log::info!(
            target: "warden::teams",
            "msg=\"member updated\", team_id={}, member_id={}, updated_by={}",
            member.team_id,
            member.id,
            caller.user_id
        );

        dispatch(TeamEvent::MemberUpdated {
            team_id: member.team_id.clone(),
            member_id: member.id.clone(),
            updated_by: caller.user_id.to_owned(),
            at: Utc::now(),
        })
        .await;

        Ok(member)
    }

    fn may_grant(&self, ctx: &TeamContext, caller: &Caller<'_>, input: &EditMemberInput) -> bool {
        let editor = ctx.resolve(caller.user_id);

        let project_ok = input.permissions.as_ref().map_or(true, |set| {
            set.iter()
                .all(|p| self.policy.member_can(p, editor.as_ref(), caller.role))
        });
        let organisation_ok = input.organisation_permissions.as_ref().map_or(true, |set| {
            set.iter()
                .all(|p| self.policy.member_can_org(p, editor.as_ref(), caller.role))
        });

        project_ok && organisation_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::actions::testing::Fixture;
    use crate::teams::{GlobalRole, PublishingStatus, Visibility};

    fn edit(team_id: &str, member_id: &str) -> EditMemberInput {
        EditMemberInput {
            team_id: team_id.to_owned(),
            member_id: member_id.to_owned(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_owner_grants_permissions() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);
        fx.member("m2", "p1-team", "u2", &[], &[]);

        let action = EditMemberAction::new(fx.loader());
        let mut input = edit("p1-team", "m2");
        input.role = Some("Artist".to_owned());
        input.permissions = Some(
            [ProjectPermission::UploadVersion, ProjectPermission::EditDetails]
                .into_iter()
                .collect(),
        );

        let member = action
            .execute(input, &Viewer::user("p1-owner", GlobalRole::User))
            .await
            .unwrap();

        assert_eq!(member.role, "Artist");
        assert!(member.permissions.contains(ProjectPermission::UploadVersion));
        assert!(member.permissions.contains(ProjectPermission::EditDetails));
        assert_eq!(member.permissions.len(), 2);
    }

    #[tokio::test]
    async fn test_cannot_grant_unheld_permission() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);
        fx.member(
            "m2",
            "p1-team",
            "u2",
            &[ProjectPermission::EditMember, ProjectPermission::UploadVersion],
            &[],
        );
        fx.member("m3", "p1-team", "u3", &[], &[]);

        let action = EditMemberAction::new(fx.loader());
        let editor = Viewer::user("u2", GlobalRole::User);

        let mut input = edit("p1-team", "m3");
        input.permissions = Some([ProjectPermission::UploadVersion].into_iter().collect());
        assert!(action.execute(input, &editor).await.is_ok());

        let mut input = edit("p1-team", "m3");
        input.permissions = Some([ProjectPermission::DeleteProject].into_iter().collect());
        let result = action.execute(input, &editor).await;
        assert!(matches!(result.unwrap_err(), AccessError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_owner_permissions_fixed() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = EditMemberAction::new(fx.loader());
        let mut input = edit("p1-team", "p1-owner-m");
        input.permissions = Some(PermissionSet::new());

        let result = action
            .execute(input, &Viewer::user("p1-owner", GlobalRole::User))
            .await;

        assert!(matches!(result.unwrap_err(), AccessError::InvalidRequest(_)));
        assert_eq!(
            fx.find_member("p1-owner-m").unwrap().permissions,
            PermissionSet::all()
        );
    }

    #[tokio::test]
    async fn test_owner_role_label_can_change() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = EditMemberAction::new(fx.loader());
        let mut input = edit("p1-team", "p1-owner-m");
        input.role = Some("Lead".to_owned());

        let member = action
            .execute(input, &Viewer::user("p1-owner", GlobalRole::User))
            .await
            .unwrap();

        assert_eq!(member.role, "Lead");
        assert!(member.is_owner);
    }

    #[tokio::test]
    async fn test_without_edit_member_unauthorized() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);
        fx.member("m2", "p1-team", "u2", &[ProjectPermission::ManageInvites], &[]);
        fx.member("m3", "p1-team", "u3", &[], &[]);

        let action = EditMemberAction::new(fx.loader());
        let mut input = edit("p1-team", "m3");
        input.role = Some("Tester".to_owned());

        let result = action
            .execute(input, &Viewer::user("u2", GlobalRole::User))
            .await;

        assert_eq!(
            result.unwrap_err(),
            AccessError::Unauthorized("You don't have access to edit members".to_owned())
        );
    }

    #[tokio::test]
    async fn test_unknown_member() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = EditMemberAction::new(fx.loader());
        let result = action
            .execute(edit("p1-team", "missing"), &Viewer::user("p1-owner", GlobalRole::User))
            .await;

        assert_eq!(result.unwrap_err(), AccessError::NotFound);
    }

    #[tokio::test]
    async fn test_org_team_edits_organisation_permissions() {
        let fx = Fixture::new();
        fx.organisation("o1", "org-owner");
        fx.member("m2", "o1-team", "u2", &[], &[]);

        let action = EditMemberAction::new(fx.loader());
        let mut input = edit("o1-team", "m2");
        input.organisation_permissions =
            Some([OrganisationPermission::AddProject].into_iter().collect());

        let member = action
            .execute(input, &Viewer::user("org-owner", GlobalRole::User))
            .await
            .unwrap();

        assert!(member
            .organisation_permissions
            .contains(OrganisationPermission::AddProject));
    }

    #[tokio::test]
    async fn test_admin_edits_any_team() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Private, PublishingStatus::Draft, None);
        fx.member("m2", "p1-team", "u2", &[], &[]);

        let action = EditMemberAction::new(fx.loader());
        let mut input = edit("p1-team", "m2");
        input.permissions = Some(PermissionSet::all());

        let member = action
            .execute(input, &Viewer::user("admin", GlobalRole::Admin))
            .await
            .unwrap();

        assert_eq!(member.permissions, PermissionSet::all());
    }
}
