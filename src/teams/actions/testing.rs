//! Shared fixtures for action tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;

use super::context::MembershipLoader;
use crate::teams::mocks::{
    MockMemberRepository, MockOrganisationRepository, MockProjectRepository, MockTeamRepository,
};
use crate::teams::{
    Member, MemberStatus, Organisation, OrganisationPermission, PermissionSet, Project,
    ProjectPermission, PublishingStatus, Team, TeamOwner, Visibility,
};

pub(crate) type Loader = MembershipLoader<
    Arc<MockTeamRepository>,
    Arc<MockMemberRepository>,
    Arc<MockProjectRepository>,
    Arc<MockOrganisationRepository>,
>;

/// In-memory store where project `p` has team `p-team` owned by user
/// `p-owner`, and organisation `o` has team `o-team`.
pub(crate) struct Fixture {
    pub teams: Arc<MockTeamRepository>,
    pub members: Arc<MockMemberRepository>,
    pub projects: Arc<MockProjectRepository>,
    pub organisations: Arc<MockOrganisationRepository>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            teams: Arc::new(MockTeamRepository::new()),
            members: Arc::new(MockMemberRepository::new()),
            projects: Arc::new(MockProjectRepository::new()),
            organisations: Arc::new(MockOrganisationRepository::new()),
        }
    }

    pub fn loader(&self) -> Loader {
        MembershipLoader::new(
            Arc::clone(&self.teams),
            Arc::clone(&self.members),
            Arc::clone(&self.projects),
            Arc::clone(&self.organisations),
        )
    }

    pub fn project(
        &self,
        id: &str,
        visibility: Visibility,
        status: PublishingStatus,
        organisation_id: Option<&str>,
    ) {
        let team_id = format!("{id}-team");
        self.teams
            .insert(Team {
                id: team_id.clone(),
                owner: TeamOwner::Project(id.to_owned()),
                created_at: Utc::now(),
            })
            .unwrap();
        self.members
            .insert(Member::owner(format!("{id}-owner-m"), &team_id, format!("{id}-owner")))
            .unwrap();
        self.projects
            .insert(Project {
                id: id.to_owned(),
                slug: id.to_owned(),
                name: id.to_uppercase(),
                team_id,
                organisation_id: organisation_id.map(str::to_owned),
                visibility,
                status,
            })
            .unwrap();
    }

    pub fn organisation(&self, id: &str, owner_user_id: &str) {
        let team_id = format!("{id}-team");
        self.teams
            .insert(Team {
                id: team_id.clone(),
                owner: TeamOwner::Organisation(id.to_owned()),
                created_at: Utc::now(),
            })
            .unwrap();
        self.members
            .insert(Member::owner(format!("{id}-owner-m"), &team_id, owner_user_id))
            .unwrap();
        self.organisations
            .insert(Organisation {
                id: id.to_owned(),
                slug: id.to_owned(),
                name: id.to_uppercase(),
                team_id,
            })
            .unwrap();
    }

    /// Seed an accepted, non-owner member.
    pub fn member(
        &self,
        member_id: &str,
        team_id: &str,
        user_id: &str,
        permissions: &[ProjectPermission],
        organisation_permissions: &[OrganisationPermission],
    ) {
        let mut member = Member::pending(member_id, team_id, user_id, "Member");
        member.status = MemberStatus::Accepted;
        member.accepted_at = Some(Utc::now());
        member.permissions = permissions.iter().copied().collect::<PermissionSet<_>>();
        member.organisation_permissions = organisation_permissions.iter().copied().collect();
        self.members.insert(member).unwrap();
    }

    pub fn pending(&self, member_id: &str, team_id: &str, user_id: &str) {
        self.members
            .insert(Member::pending(member_id, team_id, user_id, "Member"))
            .unwrap();
    }

    pub fn find_member(&self, member_id: &str) -> Option<Member> {
        self.members
            .members
            .read()
            .unwrap()
            .iter()
            .find(|m| m.id == member_id)
            .cloned()
    }
}
