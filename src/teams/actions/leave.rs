use chrono::Utc;

use crate::events::{dispatch, TeamEvent};
use crate::teams::{MemberRepository, Viewer};
use crate::AccessError;

use super::context::Caller;

/// Action for a member to leave a team, or decline a pending invite.
///
/// The owner can't leave; ownership has to be transferred first.
pub struct LeaveTeamAction<M>
where
    M: MemberRepository,
{
    member_repo: M,
}

impl<M> LeaveTeamAction<M>
where
    M: MemberRepository,
{
    pub fn new(member_repo: M) -> Self {
        Self { member_repo }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "leave_team", skip_all, err)
    )]
    pub async fn execute(&self, team_id: &str, viewer: &Viewer) -> Result<(), AccessError> {
        let caller = Caller::from_viewer(viewer)?;

        let member = self
            .member_repo
            .find_by_team_and_user(team_id, caller.user_id)
            .await?
            .ok_or(AccessError::NotFound)?;

        if member.is_owner {
            return Err(AccessError::OwnerCannotLeave);
        }

        self.member_repo.delete(&member.id).await?;

        log::info!(
            target: "warden::teams",
            "msg=\"member left\", team_id={team_id}, user_id={}, was_pending={}",
            member.user_id,
            member.is_pending()
        );

        dispatch(TeamEvent::MemberLeft {
            team_id: member.team_id,
            user_id: member.user_id,
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::actions::testing::Fixture;
    use crate::teams::{GlobalRole, PublishingStatus, Visibility};

    #[tokio::test]
    async fn test_member_leaves() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);
        fx.member("m2", "p1-team", "u2", &[], &[]);

        let action = LeaveTeamAction::new(fx.members.clone());
        action
            .execute("p1-team", &Viewer::user("u2", GlobalRole::User))
            .await
            .unwrap();

        assert!(fx.find_member("m2").is_none());
    }

    #[tokio::test]
    async fn test_decline_pending_invite() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);
        fx.pending("m2", "p1-team", "u2");

        let action = LeaveTeamAction::new(fx.members.clone());
        action
            .execute("p1-team", &Viewer::user("u2", GlobalRole::User))
            .await
            .unwrap();

        assert!(fx.find_member("m2").is_none());
    }

    #[tokio::test]
    async fn test_owner_cannot_leave() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = LeaveTeamAction::new(fx.members.clone());
        let result = action
            .execute("p1-team", &Viewer::user("p1-owner", GlobalRole::User))
            .await;

        assert_eq!(result.unwrap_err(), AccessError::OwnerCannotLeave);
        assert!(fx.find_member("p1-owner-m").is_some());
    }

    #[tokio::test]
    async fn test_non_member_not_found() {
        let fx = Fixture::new();
        fx.project("p1", Visibility::Listed, PublishingStatus::Published, None);

        let action = LeaveTeamAction::new(fx.members.clone());
        let result = action
            .execute("p1-team", &Viewer::user("u9", GlobalRole::User))
            .await;

        assert_eq!(result.unwrap_err(), AccessError::NotFound);
    }
}
