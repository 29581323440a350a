use chrono::Utc;

use super::context::{deny, Caller, MembershipLoader, TeamAbility};
use crate::events::{dispatch, TeamEvent};
use crate::teams::repository::{
    MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository,
};
use crate::teams::{AccessPolicy, Viewer};
use crate::AccessError;

/// Action to remove a member, or revoke a pending invite.
pub struct RemoveMemberAction<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    loader: MembershipLoader<T, M, P, O>,
    policy: AccessPolicy,
}

impl<T, M, P, O> RemoveMemberAction<T, M, P, O>
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

    /// Pending invites may be revoked by anyone who can manage invites;
    /// accepted members need `remove_member`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "remove_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        team_id: &str,
        member_id: &str,
        remover: &Viewer,
    ) -> Result<(), AccessError> {
        let caller = Caller::from_viewer(remover)?;
        let ctx = self.loader.load_team(team_id).await?;

        if !ctx.is_known_to(&self.policy, &caller) {
            return Err(deny(Some(caller.user_id), team_id, AccessError::NotFound).await);
        }

        let target = ctx.member(member_id).ok_or(AccessError::NotFound)?;
        if target.is_owner {
            return Err(AccessError::CannotRemoveOwner);
        }

        let ability = if target.is_pending() {
            TeamAbility::ManageInvites
        } else {
            TeamAbility::RemoveMember
        };
        if !ctx.allows(&self.policy, ability, &caller) {
            let err = ability.denied();
            return Err(deny(Some(caller.user_id), team_id, err).await);
        }

        self.loader.members().delete(&target.id).await?;

        log::info!(
            target: "warden::teams",
            "msg=\"member removed\", team_id={team_id}, member_id={member_id}, removed_by={}",
            caller.user_id
        );

        dispatch(TeamEvent::MemberRemoved {
            team_id: team_id.to_owned(),
            member_id: member_id.to_owned(),
            removed_by: caller.user_id.to_owned(),
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}
