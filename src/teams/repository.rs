use std::sync::Arc;

use async_trait::async_trait;

use super::permission_set::PermissionSet;
use super::permissions::{OrganisationPermission, ProjectPermission};
use super::types::{Member, Organisation, Project, Team};
use crate::AccessError;

#[derive(Debug, Clone)]
pub struct CreateMember {
    pub team_id: String,
    pub user_id: String,
    pub role: String,
}

/// Fields to change on a member. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMember {
    pub role: Option<String>,
    pub permissions: Option<PermissionSet<ProjectPermission>>,
    pub organisation_permissions: Option<PermissionSet<OrganisationPermission>>,
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Team>, AccessError>;
}

/// Storage for team members.
///
/// `find_by_team` returns members ordered by acceptance date, pending invites
/// last.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, data: CreateMember) -> Result<Member, AccessError>;
    /// Create an accepted owner record with no listed permissions.
    async fn create_owner(&self, data: CreateMember) -> Result<Member, AccessError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Member>, AccessError>;
    async fn find_by_team(&self, team_id: &str) -> Result<Vec<Member>, AccessError>;
    async fn find_by_team_and_user(
        &self,
        team_id: &str,
        user_id: &str,
    ) -> Result<Option<Member>, AccessError>;
    async fn update(&self, id: &str, data: UpdateMember) -> Result<Member, AccessError>;
    async fn mark_accepted(&self, id: &str) -> Result<Member, AccessError>;
    async fn delete(&self, id: &str) -> Result<(), AccessError>;
    async fn delete_by_team(&self, team_id: &str) -> Result<(), AccessError>;
    /// Move the owner flag from one member of a team to another in a single
    /// write, so the team never has zero or two owners.
    async fn transfer_ownership(
        &self,
        team_id: &str,
        from_member_id: &str,
        to_member_id: &str,
    ) -> Result<(), AccessError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AccessError>;
    async fn find_by_team(&self, team_id: &str) -> Result<Option<Project>, AccessError>;
    async fn set_organisation(
        &self,
        id: &str,
        organisation_id: Option<&str>,
    ) -> Result<Project, AccessError>;
}

#[async_trait]
pub trait OrganisationRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Organisation>, AccessError>;
    async fn find_by_team(&self, team_id: &str) -> Result<Option<Organisation>, AccessError>;
}

#[async_trait]
impl<T: TeamRepository + ?Sized> TeamRepository for Arc<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<Team>, AccessError> {
        (**self).find_by_id(id).await
    }
}

#[async_trait]
impl<T: MemberRepository + ?Sized> MemberRepository for Arc<T> {
    async fn create(&self, data: CreateMember) -> Result<Member, AccessError> {
        (**self).create(data).await
    }

    async fn create_owner(&self, data: CreateMember) -> Result<Member, AccessError> {
        (**self).create_owner(data).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Member>, AccessError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_team(&self, team_id: &str) -> Result<Vec<Member>, AccessError> {
        (**self).find_by_team(team_id).await
    }

    async fn find_by_team_and_user(
        &self,
        team_id: &str,
        user_id: &str,
    ) -> Result<Option<Member>, AccessError> {
        (**self).find_by_team_and_user(team_id, user_id).await
    }

    async fn update(&self, id: &str, data: UpdateMember) -> Result<Member, AccessError> {
        (**self).update(id, data).await
    }

    async fn mark_accepted(&self, id: &str) -> Result<Member, AccessError> {
        (**self).mark_accepted(id).await
    }

    async fn delete(&self, id: &str) -> Result<(), AccessError> {
        (**self).delete(id).await
    }

    async fn delete_by_team(&self, team_id: &str) -> Result<(), AccessError> {
        (**self).delete_by_team(team_id).await
    }

    async fn transfer_ownership(
        &self,
        team_id: &str,
        from_member_id: &str,
        to_member_id: &str,
    ) -> Result<(), AccessError> {
        (**self)
            .transfer_ownership(team_id, from_member_id, to_member_id)
            .await
    }
}

#[async_trait]
impl<T: ProjectRepository + ?Sized> ProjectRepository for Arc<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AccessError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_team(&self, team_id: &str) -> Result<Option<Project>, AccessError> {
        (**self).find_by_team(team_id).await
    }

    async fn set_organisation(
        &self,
        id: &str,
        organisation_id: Option<&str>,
    ) -> Result<Project, AccessError> {
        (**self).set_organisation(id, organisation_id).await
    }
}

#[async_trait]
impl<T: OrganisationRepository + ?Sized> OrganisationRepository for Arc<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<Organisation>, AccessError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_team(&self, team_id: &str) -> Result<Option<Organisation>, AccessError> {
        (**self).find_by_team(team_id).await
    }
}
