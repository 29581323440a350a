//! The permission vocabularies and global user roles.

use serde::{Deserialize, Serialize};

use super::traits::Permission;

/// Permissions a member holds on a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPermission {
    UploadVersion,
    DeleteVersion,
    EditDetails,
    EditDescription,
    ManageInvites,
    RemoveMember,
    EditMember,
    DeleteProject,
    ViewAnalytics,
    ViewRevenue,
}

impl Permission for ProjectPermission {
    fn as_str(&self) -> &'static str {
        match self {
            Self::UploadVersion => "upload_version",
            Self::DeleteVersion => "delete_version",
            Self::EditDetails => "edit_details",
            Self::EditDescription => "edit_description",
            Self::ManageInvites => "manage_invites",
            Self::RemoveMember => "remove_member",
            Self::EditMember => "edit_member",
            Self::DeleteProject => "delete_project",
            Self::ViewAnalytics => "view_analytics",
            Self::ViewRevenue => "view_revenue",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "upload_version" => Some(Self::UploadVersion),
            "delete_version" => Some(Self::DeleteVersion),
            "edit_details" => Some(Self::EditDetails),
            "edit_description" => Some(Self::EditDescription),
            "manage_invites" => Some(Self::ManageInvites),
            "remove_member" => Some(Self::RemoveMember),
            "edit_member" => Some(Self::EditMember),
            "delete_project" => Some(Self::DeleteProject),
            "view_analytics" => Some(Self::ViewAnalytics),
            "view_revenue" => Some(Self::ViewRevenue),
            _ => None,
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::UploadVersion,
            Self::DeleteVersion,
            Self::EditDetails,
            Self::EditDescription,
            Self::ManageInvites,
            Self::RemoveMember,
            Self::EditMember,
            Self::DeleteProject,
            Self::ViewAnalytics,
            Self::ViewRevenue,
        ]
    }
}

/// Permissions a member holds on an organisation.
///
/// Stored on organisation-team members as their standing in the organisation,
/// and on project-team members as per-project overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganisationPermission {
    EditDetails,
    ManageInvites,
    RemoveMember,
    EditMember,
    AddProject,
    RemoveProject,
    DeleteOrganization,
    EditMemberDefaultPermissions,
}

impl Permission for OrganisationPermission {
    fn as_str(&self) -> &'static str {
        match self {
            Self::EditDetails => "edit_details",
            Self::ManageInvites => "manage_invites",
            Self::RemoveMember => "remove_member",
            Self::EditMember => "edit_member",
            Self::AddProject => "add_project",
            Self::RemoveProject => "remove_project",
            Self::DeleteOrganization => "delete_organization",
            Self::EditMemberDefaultPermissions => "edit_member_default_permissions",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "edit_details" => Some(Self::EditDetails),
            "manage_invites" => Some(Self::ManageInvites),
            "remove_member" => Some(Self::RemoveMember),
            "edit_member" => Some(Self::EditMember),
            "add_project" => Some(Self::AddProject),
            "remove_project" => Some(Self::RemoveProject),
            "delete_organization" => Some(Self::DeleteOrganization),
            "edit_member_default_permissions" => Some(Self::EditMemberDefaultPermissions),
            _ => None,
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::EditDetails,
            Self::ManageInvites,
            Self::RemoveMember,
            Self::EditMember,
            Self::AddProject,
            Self::RemoveProject,
            Self::DeleteOrganization,
            Self::EditMemberDefaultPermissions,
        ]
    }
}

/// Site-wide role of a user, independent of any team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    Admin,
    Moderator,
    #[default]
    User,
}

impl GlobalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::User => "user",
        }
    }

    /// Parse a stored role. Unknown values fall back to `None` so callers can
    /// treat them as a plain user.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "moderator" => Some(Self::Moderator),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}
