use chrono::Utc;

use super::context::{deny, Caller, MembershipLoader, TeamAbility};
use crate::events::{dispatch, TeamEvent};
use crate::teams::repository::{
    CreateMember, MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository,
};
use crate::teams::{AccessPolicy, Member, Viewer};
use crate::validators::validate_role_label;
use crate::AccessError;

/// Input data for inviting a user to a team.
#[derive(Debug, Clone)]
pub struct InviteMemberInput {
    pub team_id: String,
    pub invitee_id: String,
    /// Role label for the new member. Defaults to the configured label.
    pub role: Option<String>,
}

/// Action to invite a user to a project or organisation team.
///
/// This action:
/// 1. Loads the team and resolves the inviter's membership
/// 2. Verifies the inviter may manage invites in the team's scope
/// 3. Rejects invitees that are already in the team
/// 4. Creates a pending member with no permissions
pub struct InviteMemberAction<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    loader: MembershipLoader<T, M, P, O>,
    policy: AccessPolicy,
}

impl<T, M, P, O> InviteMemberAction<T, M, P, O>
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

    /// Invites `input.invitee_id` on behalf of `inviter`.
    ///
    /// # Returns
    ///
    /// - `Ok(member)` - the pending member record
    /// - `Err(AccessError::NotFound)` - team missing, or inviter has no membership
    /// - `Err(AccessError::Unauthorized(_))` - inviter can't manage invites
    /// - `Err(AccessError::AlreadyMember)` - invitee already in the team
    /// - `Err(AccessError::Validation(_))` - bad role label
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "invite_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        input: InviteMemberInput,
        inviter: &Viewer,
    ) -> Result<Member, AccessError> {
        let caller = Caller::from_viewer(inviter)?;
        let role = input
            .role
            .unwrap_or_else(|| self.policy.config().default_member_role.clone());
        validate_role_label(&role)?;

        let ctx = self.loader.load_team(&input.team_id).await?;

        if !ctx.is_known_to(&self.policy, &caller) {
            return Err(deny(Some(caller.user_id), &input.team_id, AccessError::NotFound).await);
        }

        if !ctx.allows(&self.policy, TeamAbility::ManageInvites, &caller) {
            let err = TeamAbility::ManageInvites.denied();
            return Err(deny(Some(caller.user_id), &input.team_id, err).await);
        }

        if ctx.members.iter().any(|m| m.user_id == input.invitee_id) {
            return Err(AccessError::AlreadyMember);
        }

        let member = self
            .loader
            .members()
            .create(CreateMember {
                team_id: ctx.team.id.clone(),
                user_id: input.invitee_id,
                role: role.trim().to_owned(),
            })
            .await?;

        log::info!(
            target: "warden::teams",
            "msg=\"member invited\", team_id={}, user_id={}, invited_by={}",
            member.team_id,
            member.user_id,
            caller.user_id
        );

        dispatch(TeamEvent::MemberInvited {
            team_id: member.team_id.clone(),
            user_id: member.user_id.clone(),
            invited_by: caller.user_id.to_owned(),
            at: Utc::now(),
        })
        .await;

        Ok(member)
    }
}
