use chrono::Utc;

use crate::events::{dispatch, TeamEvent};
use crate::teams::{Member, MemberRepository, Viewer};
use crate::AccessError;

use super::context::Caller;

/// Action to accept a pending team invite.
///
/// This action:
/// 1. Finds the caller's record in the team
/// 2. Verifies it is still pending
/// 3. Marks it accepted, which makes its permissions take effect
pub struct AcceptInviteAction<M>
where
    M: MemberRepository,
{
    member_repo: M,
}

impl<M> AcceptInviteAction<M>
where
    M: MemberRepository,
{
    pub fn new(member_repo: M) -> Self {
        Self { member_repo }
    }

    /// Accepts the caller's invite to `team_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(member)` - the now accepted member record
    /// - `Err(AccessError::NoPendingInvite)` - no record, or already accepted
    /// - `Err(AccessError::Unauthorized(_))` - caller is not signed in
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "accept_invite", skip_all, err)
    )]
    pub async fn execute(&self, team_id: &str, viewer: &Viewer) -> Result<Member, AccessError> {
        let caller = Caller::from_viewer(viewer)?;

        let pending = self
            .member_repo
            .find_by_team_and_user(team_id, caller.user_id)
            .await?
            .filter(Member::is_pending)
            .ok_or(AccessError::NoPendingInvite)?;

        let member = self.member_repo.mark_accepted(&pending.id).await?;

        log::info!(
            target: "warden::teams",
            "msg=\"invite accepted\", team_id={}, user_id={}",
            member.team_id,
            member.user_id
        );

        dispatch(TeamEvent::InviteAccepted {
            team_id: member.team_id.clone(),
            user_id: member.user_id.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::actions::testing::Fixture;
    use crate::teams::{GlobalRole, PublishingStatus, Visibility};

    #[tokio::test]
    async fn test_accept_pending_invite() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);
        fx.pending("m2", "p1-team", "u2");

        let action = AcceptInviteAction::new(fx.members.clone());
        let member = action
            .execute("p1-team", &Viewer::user("u2", GlobalRole::User))
            .await
            .unwrap();

        assert!(member.is_accepted());
        assert!(member.accepted_at.is_some());
        assert!(fx.find_member("m2").unwrap().is_accepted());
    }

    #[tokio::test]
    async fn test_accept_twice() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);
        fx.pending("m2", "p1-team", "u2");

        let action = AcceptInviteAction::new(fx.members.clone());
        let viewer = Viewer::user("u2", GlobalRole::User);
        action.execute("p1-team", &viewer).await.unwrap();

        let result = action.execute("p1-team", &viewer).await;
        assert_eq!(result.unwrap_err(), AccessError::NoPendingInvite);
    }

    #[tokio::test]
    async fn test_accept_without_invite() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = AcceptInviteAction::new(fx.members.clone());
        let result = action
            .execute("p1-team", &Viewer::user("u9", GlobalRole::User))
            .await;

        assert_eq!(result.unwrap_err(), AccessError::NoPendingInvite);
    }

    #[tokio::test]
    async fn test_accept_requires_sign_in() {
        let fx = Fixture::new();

        let action = AcceptInviteAction::new(fx.members.clone());
        let result = action.execute("p1-team", &Viewer::anonymous()).await;

        assert!(matches!(result.unwrap_err(), AccessError::Unauthorized(_)));
    }
}
