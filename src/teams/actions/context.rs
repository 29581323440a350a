use chrono::Utc;

use crate::events::{dispatch, TeamEvent};
use crate::teams::membership::{resolve_effective_member, EffectiveMember};
use crate::teams::repository::{
    MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository,
};
use crate::teams::{
    AccessPolicy, Member, Organisation, OrganisationPermission, Project, ProjectPermission, Team,
    TeamOwner, Viewer,
};
use crate::AccessError;

/// A team together with everyone who may act on it.
#[derive(Debug, Clone)]
pub struct TeamContext {
    pub team: Team,
    /// The team's own members.
    pub members: Vec<Member>,
    /// Members of the owning organisation's team, for project teams whose
    /// project belongs to an organisation.
    pub inherited: Vec<Member>,
    /// The project, for project teams.
    pub project: Option<Project>,
}

impl TeamContext {
    /// Resolve the caller's membership, direct records first.
    pub fn resolve(&self, user_id: &str) -> Option<EffectiveMember<'_>> {
        match self.team.owner {
            TeamOwner::Project(_) => {
                resolve_effective_member(user_id, &self.members, &self.inherited)
            }
            TeamOwner::Organisation(_) => resolve_effective_member(user_id, &[], &self.members),
        }
    }

    /// Find a member of this team by record id.
    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn owner(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.is_owner)
    }

    /// Members, inherited members and staff may learn the team exists.
    pub fn is_known_to(&self, policy: &AccessPolicy, caller: &Caller<'_>) -> bool {
        self.resolve(caller.user_id).is_some() || policy.config().visibility.is_staff(caller.role)
    }

    /// Check a team-management ability in the scope matching the team.
    pub fn allows(&self, policy: &AccessPolicy, ability: TeamAbility, caller: &Caller<'_>) -> bool {
        let member = self.resolve(caller.user_id);
        match self.team.owner {
            TeamOwner::Project(_) => {
                policy.member_can(ability.project(), member.as_ref(), caller.role)
            }
            TeamOwner::Organisation(_) => {
                policy.member_can_org(ability.organisation(), member.as_ref(), caller.role)
            }
        }
    }
}

/// A project with its team and, if owned by an organisation, that team too.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project: Project,
    pub members: Vec<Member>,
    pub org_members: Vec<Member>,
}

impl ProjectContext {
    pub fn resolve(&self, user_id: &str) -> Option<EffectiveMember<'_>> {
        resolve_effective_member(user_id, &self.members, &self.org_members)
    }
}

/// An organisation with its team.
#[derive(Debug, Clone)]
pub struct OrganisationContext {
    pub organisation: Organisation,
    pub members: Vec<Member>,
}

impl OrganisationContext {
    pub fn resolve(&self, user_id: &str) -> Option<EffectiveMember<'_>> {
        resolve_effective_member(user_id, &[], &self.members)
    }
}

/// Team-management operations that exist in both permission scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamAbility {
    ManageInvites,
    EditMember,
    RemoveMember,
}

impl TeamAbility {
    pub fn project(self) -> ProjectPermission {
        match self {
            Self::ManageInvites => ProjectPermission::ManageInvites,
            Self::EditMember => ProjectPermission::EditMember,
            Self::RemoveMember => ProjectPermission::RemoveMember,
        }
    }

    pub fn organisation(self) -> OrganisationPermission {
        match self {
            Self::ManageInvites => OrganisationPermission::ManageInvites,
            Self::EditMember => OrganisationPermission::EditMember,
            Self::RemoveMember => OrganisationPermission::RemoveMember,
        }
    }

    pub fn denial_message(self) -> &'static str {
        match self {
            Self::ManageInvites => "You don't have access to manage member invites",
            Self::EditMember => "You don't have access to edit members",
            Self::RemoveMember => "You don't have access to remove members",
        }
    }

    /// The `Unauthorized` error returned when the caller lacks this ability.
    pub fn denied(self) -> AccessError {
        AccessError::Unauthorized(self.denial_message().to_owned())
    }
}

/// A signed-in caller of a mutating action.
#[derive(Debug, Clone, Copy)]
pub struct Caller<'a> {
    pub user_id: &'a str,
    pub role: Option<crate::teams::GlobalRole>,
}

impl<'a> Caller<'a> {
    /// Mutations require a signed-in viewer.
    pub fn from_viewer(viewer: &'a Viewer) -> Result<Self, AccessError> {
        let user_id = viewer
            .user_id()
            .ok_or_else(|| AccessError::Unauthorized("You must be signed in".to_owned()))?;
        Ok(Self {
            user_id,
            role: viewer.role,
        })
    }
}

/// Loads teams, projects and organisations together with their members.
#[derive(Debug, Clone)]
pub struct MembershipLoader<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    teams: T,
    members: M,
    projects: P,
    organisations: O,
}

impl<T, M, P, O> MembershipLoader<T, M, P, O>
where
    T: TeamRepository,
    M: MemberRepository,
    P: ProjectRepository,
    O: OrganisationRepository,
{
    pub fn new(teams: T, members: M, projects: P, organisations: O) -> Self {
        Self {
            teams,
            members,
            projects,
            organisations,
        }
    }

    pub fn members(&self) -> &M {
        &self.members
    }

    pub fn projects(&self) -> &P {
        &self.projects
    }

    pub async fn load_team(&self, team_id: &str) -> Result<TeamContext, AccessError> {
        let team = self
            .teams
            .find_by_id(team_id)
            .await?
            .ok_or(AccessError::NotFound)?;
        let members = self.members.find_by_team(&team.id).await?;

        let (project, inherited) = match &team.owner {
            TeamOwner::Project(project_id) => {
                let project = self
                    .projects
                    .find_by_id(project_id)
                    .await?
                    .ok_or(AccessError::NotFound)?;
                let inherited = self
                    .organisation_members(project.organisation_id.as_deref())
                    .await?;
                (Some(project), inherited)
            }
            TeamOwner::Organisation(_) => (None, Vec::new()),
        };

        Ok(TeamContext {
            team,
            members,
            inherited,
            project,
        })
    }

    pub async fn load_project(&self, project_id: &str) -> Result<ProjectContext, AccessError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(AccessError::NotFound)?;
        let members = self.members.find_by_team(&project.team_id).await?;
        let org_members = self
            .organisation_members(project.organisation_id.as_deref())
            .await?;

        Ok(ProjectContext {
            project,
            members,
            org_members,
        })
    }

    pub async fn load_organisation(
        &self,
        organisation_id: &str,
    ) -> Result<OrganisationContext, AccessError> {
        let organisation = self
            .organisations
            .find_by_id(organisation_id)
            .await?
            .ok_or(AccessError::NotFound)?;
        let members = self.members.find_by_team(&organisation.team_id).await?;

        Ok(OrganisationContext {
            organisation,
            members,
        })
    }

    async fn organisation_members(
        &self,
        organisation_id: Option<&str>,
    ) -> Result<Vec<Member>, AccessError> {
        let Some(organisation_id) = organisation_id else {
            return Ok(Vec::new());
        };

        match self.organisations.find_by_id(organisation_id).await? {
            Some(organisation) => self.members.find_by_team(&organisation.team_id).await,
            None => {
                log::warn!(
                    target: "warden::teams",
                    "msg=\"project references missing organisation\", organisation_id={organisation_id}"
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Report a denial and build the error for it.
pub(crate) async fn deny(
    user_id: Option<&str>,
    resource_id: &str,
    error: AccessError,
) -> AccessError {
    log::debug!(
        target: "warden::teams",
        "msg=\"access denied\", user_id={}, resource_id={resource_id}, reason=\"{error}\"",
        user_id.unwrap_or("anonymous")
    );

    dispatch(TeamEvent::AccessDenied {
        user_id: user_id.map(str::to_owned),
        resource_id: resource_id.to_owned(),
        reason: error.to_string(),
        at: Utc::now(),
    })
    .await;

    error
}
