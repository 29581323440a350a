//! Core records for teams, projects and organisations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permission_set::PermissionSet;
use super::permissions::{OrganisationPermission, ProjectPermission};

/// Acceptance state of a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Pending,
    Accepted,
}

/// A user's standing in a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier.
    pub id: String,
    /// The team this membership belongs to.
    pub team_id: String,
    /// The user who is a member.
    pub user_id: String,
    /// Free-text label shown next to the member, e.g. "Lead developer".
    pub role: String,
    /// The single owner of the team bypasses all permission checks.
    pub is_owner: bool,
    pub permissions: PermissionSet<ProjectPermission>,
    pub organisation_permissions: PermissionSet<OrganisationPermission>,
    pub status: MemberStatus,
    /// When the invite was created.
    pub invited_at: DateTime<Utc>,
    /// When the invite was accepted, if it was.
    pub accepted_at: Option<DateTime<Utc>>,
}

impl Member {
    /// A freshly invited member: pending, not owner, no permissions.
    pub fn pending(
        id: impl Into<String>,
        team_id: impl Into<String>,
        user_id: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            team_id: team_id.into(),
            user_id: user_id.into(),
            role: role.into(),
            is_owner: false,
            permissions: PermissionSet::new(),
            organisation_permissions: PermissionSet::new(),
            status: MemberStatus::Pending,
            invited_at: Utc::now(),
            accepted_at: None,
        }
    }

    /// The accepted owner record created together with a team.
    pub fn owner(
        id: impl Into<String>,
        team_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            team_id: team_id.into(),
            user_id: user_id.into(),
            role: "Owner".to_owned(),
            is_owner: true,
            permissions: PermissionSet::all(),
            organisation_permissions: PermissionSet::all(),
            status: MemberStatus::Accepted,
            invited_at: now,
            accepted_at: Some(now),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == MemberStatus::Accepted
    }

    pub fn is_pending(&self) -> bool {
        self.status == MemberStatus::Pending
    }
}

/// What a team belongs to. A team is never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TeamOwner {
    Project(String),
    Organisation(String),
}

/// The permission-holding group behind a project or an organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub owner: TeamOwner,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn is_project_team(&self) -> bool {
        matches!(self.owner, TeamOwner::Project(_))
    }

    pub fn is_organisation_team(&self) -> bool {
        matches!(self.owner, TeamOwner::Organisation(_))
    }
}

/// Search/listing exposure of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Listed,
    Unlisted,
    Private,
    Archived,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listed => "listed",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
            Self::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "listed" => Some(Self::Listed),
            "unlisted" => Some(Self::Unlisted),
            "private" => Some(Self::Private),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Moderation state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishingStatus {
    Draft,
    Processing,
    Scheduled,
    #[serde(alias = "approved")]
    Published,
    Rejected,
    Withheld,
    Unknown,
}

impl PublishingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Processing => "processing",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::Withheld => "withheld",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a stored status. Unrecognized values map to `Unknown`, which is
    /// never publicly approved.
    pub fn from_str(s: &str) -> Self {
        match s {
            "draft" => Self::Draft,
            "processing" => Self::Processing,
            "scheduled" => Self::Scheduled,
            "published" | "approved" => Self::Published,
            "rejected" => Self::Rejected,
            "withheld" => Self::Withheld,
            _ => Self::Unknown,
        }
    }

    pub fn is_publicly_approved(&self) -> bool {
        match self {
            Self::Published => true,
            Self::Draft
            | Self::Processing
            | Self::Scheduled
            | Self::Rejected
            | Self::Withheld
            | Self::Unknown => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub name: String,
    /// The project's own team.
    pub team_id: String,
    /// Owning organisation, if any.
    pub organisation_id: Option<String>,
    pub visibility: Visibility,
    pub status: PublishingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub team_id: String,
}

/// Who is asking: an optional signed-in user plus their site-wide role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Option<String>,
    pub role: Option<super::GlobalRole>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>, role: super::GlobalRole) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Some(role),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams::GlobalRole;

    #[test]
    fn test_pending_member() {
        let member = Member::pending("m1", "t1", "u1", "Member");

        assert!(member.is_pending());
        assert!(!member.is_accepted());
        assert!(!member.is_owner);
        assert!(member.permissions.is_empty());
        assert!(member.organisation_permissions.is_empty());
        assert!(member.accepted_at.is_none());
    }

    #[test]
    fn test_owner_member() {
        let member = Member::owner("m1", "t1", "u1");

        assert!(member.is_owner);
        assert!(member.is_accepted());
        assert!(member.accepted_at.is_some());
        assert!(member.permissions.contains(ProjectPermission::DeleteProject));
    }

    #[test]
    fn test_team_owner_kind() {
        let team = Team {
            id: "t1".to_owned(),
            owner: TeamOwner::Organisation("o1".to_owned()),
            created_at: Utc::now(),
        };

        assert!(team.is_organisation_team());
        assert!(!team.is_project_team());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(PublishingStatus::from_str("approved"), PublishingStatus::Published);
        assert_eq!(PublishingStatus::from_str("published"), PublishingStatus::Published);
        assert_eq!(PublishingStatus::from_str("banana"), PublishingStatus::Unknown);
        assert!(!PublishingStatus::Unknown.is_publicly_approved());
        assert!(PublishingStatus::Published.is_publicly_approved());

        let status: PublishingStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, PublishingStatus::Published);
    }

    #[test]
    fn test_visibility_parsing() {
        assert_eq!(Visibility::from_str("unlisted"), Some(Visibility::Unlisted));
        assert_eq!(Visibility::from_str("hidden"), None);
        assert_eq!(Visibility::Archived.as_str(), "archived");
    }

    #[test]
    fn test_member_serde_roundtrip_keeps_permissions() {
        let mut member = Member::pending("m1", "t1", "u1", "Member");
        member.permissions.grant(ProjectPermission::UploadVersion);

        let json = serde_json::to_string(&member).unwrap();
        assert!(json.contains("\"permissions\":[\"upload_version\"]"));

        let parsed: Member = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, member);
    }

    #[test]
    fn test_viewer() {
        assert_eq!(Viewer::anonymous().user_id(), None);

        let viewer = Viewer::user("u1", GlobalRole::Moderator);
        assert_eq!(viewer.user_id(), Some("u1"));
        assert_eq!(viewer.role, Some(GlobalRole::Moderator));
    }
}
