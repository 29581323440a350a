#![allow(clippy::significant_drop_tightening)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{
    CreateMember, MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository,
    UpdateMember,
};
use super::permission_set::PermissionSet;
use super::types::{Member, MemberStatus, Organisation, Project, Team};
use crate::AccessError;

fn poisoned<T>(_: T) -> AccessError {
    AccessError::Internal("lock poisoned".into())
}

pub struct MockTeamRepository {
    pub teams: RwLock<Vec<Team>>,
}

impl MockTeamRepository {
    pub fn new() -> Self {
        Self {
            teams: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, team: Team) -> Result<(), AccessError> {
        self.teams.write().map_err(poisoned)?.push(team);
        Ok(())
    }
}

impl Default for MockTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TeamRepository for MockTeamRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Team>, AccessError> {
        let teams = self.teams.read().map_err(poisoned)?;
        Ok(teams.iter().find(|t| t.id == id).cloned())
    }
}

pub struct MockMemberRepository {
    pub members: RwLock<Vec<Member>>,
    next_id: AtomicU64,
}

impl MockMemberRepository {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seed a member as-is, bypassing the invite flow.
    pub fn insert(&self, member: Member) -> Result<(), AccessError> {
        self.members.write().map_err(poisoned)?.push(member);
        Ok(())
    }

    fn next_member_id(&self) -> String {
        format!("member-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Store a new record, keeping (team_id, user_id) unique.
    fn push(&self, member: Member) -> Result<Member, AccessError> {
        let mut members = self.members.write().map_err(poisoned)?;

        if members
            .iter()
            .any(|m| m.team_id == member.team_id && m.user_id == member.user_id)
        {
            return Err(AccessError::DatabaseError(
                "duplicate (team_id, user_id)".to_owned(),
            ));
        }

        members.push(member.clone());
        Ok(member)
    }
}

impl Default for MockMemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRepository for MockMemberRepository {
    async fn create(&self, data: CreateMember) -> Result<Member, AccessError> {
        let id = self.next_member_id();
        self.push(Member::pending(id, data.team_id, data.user_id, data.role))
    }

    async fn create_owner(&self, data: CreateMember) -> Result<Member, AccessError> {
        let mut member = Member::owner(self.next_member_id(), data.team_id, data.user_id);
        member.role = data.role;
        member.permissions = PermissionSet::new();
        member.organisation_permissions = PermissionSet::new();
        self.push(member)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Member>, AccessError> {
        let members = self.members.read().map_err(poisoned)?;
        Ok(members.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_team(&self, team_id: &str) -> Result<Vec<Member>, AccessError> {
        let members = self.members.read().map_err(poisoned)?;
        let mut found: Vec<Member> = members
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        found.sort_by_key(|m| (m.accepted_at.is_none(), m.accepted_at, m.invited_at));
        Ok(found)
    }

    async fn find_by_team_and_user(
        &self,
        team_id: &str,
        user_id: &str,
    ) -> Result<Option<Member>, AccessError> {
        let members = self.members.read().map_err(poisoned)?;
        Ok(members
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .cloned())
    }

    async fn update(&self, id: &str, data: UpdateMember) -> Result<Member, AccessError> {
        let mut members = self.members.write().map_err(poisoned)?;
        let member = members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AccessError::NotFound)?;

        if let Some(role) = data.role {
            member.role = role;
        }
        if let Some(permissions) = data.permissions {
            member.permissions = permissions;
        }
        if let Some(organisation_permissions) = data.organisation_permissions {
            member.organisation_permissions = organisation_permissions;
        }

        Ok(member.clone())
    }

    async fn mark_accepted(&self, id: &str) -> Result<Member, AccessError> {
        let mut members = self.members.write().map_err(poisoned)?;
        let member = members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AccessError::NotFound)?;

        member.status = MemberStatus::Accepted;
        member.accepted_at = Some(Utc::now());

        Ok(member.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AccessError> {
        let mut members = self.members.write().map_err(poisoned)?;
        members.retain(|m| m.id != id);
        Ok(())
    }

    async fn delete_by_team(&self, team_id: &str) -> Result<(), AccessError> {
        let mut members = self.members.write().map_err(poisoned)?;
        members.retain(|m| m.team_id != team_id);
        Ok(())
    }

    async fn transfer_ownership(
        &self,
        team_id: &str,
        from_member_id: &str,
        to_member_id: &str,
    ) -> Result<(), AccessError> {
        let mut members = self.members.write().map_err(poisoned)?;

        let in_team = |id: &str| members.iter().any(|m| m.id == id && m.team_id == team_id);
        if !in_team(from_member_id) || !in_team(to_member_id) {
            return Err(AccessError::NotFound);
        }

        for member in members.iter_mut().filter(|m| m.team_id == team_id) {
            member.is_owner = member.id == to_member_id;
        }

        Ok(())
    }
}

pub struct MockProjectRepository {
    pub projects: RwLock<Vec<Project>>,
}

impl MockProjectRepository {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, project: Project) -> Result<(), AccessError> {
        self.projects.write().map_err(poisoned)?.push(project);
        Ok(())
    }
}

impl Default for MockProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRepository for MockProjectRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AccessError> {
        let projects = self.projects.read().map_err(poisoned)?;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_team(&self, team_id: &str) -> Result<Option<Project>, AccessError> {
        let projects = self.projects.read().map_err(poisoned)?;
        Ok(projects.iter().find(|p| p.team_id == team_id).cloned())
    }

    async fn set_organisation(
        &self,
        id: &str,
        organisation_id: Option<&str>,
    ) -> Result<Project, AccessError> {
        let mut projects = self.projects.write().map_err(poisoned)?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AccessError::NotFound)?;

        project.organisation_id = organisation_id.map(str::to_owned);

        Ok(project.clone())
    }
}

pub struct MockOrganisationRepository {
    pub organisations: RwLock<Vec<Organisation>>,
}

impl MockOrganisationRepository {
    pub fn new() -> Self {
        Self {
            organisations: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, organisation: Organisation) -> Result<(), AccessError> {
        self.organisations
            .write()
            .map_err(poisoned)?
            .push(organisation);
        Ok(())
    }
}

impl Default for MockOrganisationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganisationRepository for MockOrganisationRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Organisation>, AccessError> {
        let organisations = self.organisations.read().map_err(poisoned)?;
        Ok(organisations.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_team(&self, team_id: &str) -> Result<Option<Organisation>, AccessError> {
        let organisations = self.organisations.read().map_err(poisoned)?;
        Ok(organisations.iter().find(|o| o.team_id == team_id).cloned())
    }
}
