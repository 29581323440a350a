use chrono::Utc;

use super::context::{deny, Caller, MembershipLoader};
use crate::events::{dispatch, TeamEvent};
use crate::teams::repository::{
    MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository,
};
use crate::teams::{AccessPolicy, GlobalRole, Viewer};
use crate::AccessError;

/// Action to hand a team's ownership to another accepted member.
///
/// Only the current owner or a site admin may transfer. The team has exactly
/// one owner before and after. Teams of organisation projects have no owner
/// of their own and are rejected.
pub struct TransferOwnershipAction<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    loader: MembershipLoader<T, M, P, O>,
    policy: AccessPolicy,
}

impl<T, M, P, O> TransferOwnershipAction<T, M, P, O>
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
        tracing::instrument(name = "transfer_ownership", skip_all, err)
    )]
    pub async fn execute(
        &self,
        team_id: &str,
        new_owner_member_id: &str,
        viewer: &Viewer,
    ) -> Result<(), AccessError> {
        let caller = Caller::from_viewer(viewer)?;
        let ctx = self.loader.load_team(team_id).await?;

        if !ctx.is_known_to(&self.policy, &caller) {
            return Err(deny(Some(caller.user_id), team_id, AccessError::NotFound).await);
        }

        let in_organisation = ctx
            .project
            .as_ref()
            .is_some_and(|p| p.organisation_id.is_some());
        let current = match ctx.owner() {
            Some(owner) => owner,
            None if in_organisation => {
                return Err(AccessError::InvalidRequest(
                    "This project is owned by its organization".to_owned(),
                ));
            }
            None => return Err(AccessError::Internal(format!("team {team_id} has no owner"))),
        };

        let is_owner = current.user_id == caller.user_id;
        if !is_owner && caller.role != Some(GlobalRole::Admin) {
            let err = AccessError::Unauthorized(
                "You don't have permission to edit the ownership of this team".to_owned(),
            );
            return Err(deny(Some(caller.user_id), team_id, err).await);
        }

        let target = ctx
            .member(new_owner_member_id)
            .ok_or(AccessError::NotFound)?;
        if !target.is_accepted() {
            return Err(AccessError::InvalidRequest(
                "You can only transfer ownership to members who are currently in your team"
                    .to_owned(),
            ));
        }
        if target.id == current.id {
            return Ok(());
        }

        self.loader
            .members()
            .transfer_ownership(team_id, &current.id, &target.id)
            .await?;

        log::info!(
            target: "warden::teams",
            "msg=\"ownership transferred\", team_id={team_id}, from_user_id={}, to_user_id={}, by={}",
            current.user_id,
            target.user_id,
            caller.user_id
        );

        dispatch(TeamEvent::OwnershipTransferred {
            team_id: team_id.to_owned(),
            from_user_id: current.user_id.clone(),
            to_user_id: target.user_id.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}
