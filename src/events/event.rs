use chrono::{DateTime, Utc};

/// Team events emitted by the team actions.
///
/// Events are always fired from actions. If no listeners are registered,
/// they are silently ignored (no-op). Register listeners via
/// [`register_event_listeners`](crate::register_event_listeners) to handle events.
#[derive(Debug, Clone)]
pub enum TeamEvent {
    // membership lifecycle
    MemberInvited {
        team_id: String,
        user_id: String,
        invited_by: String,
        at: DateTime<Utc>,
    },
    InviteAccepted {
        team_id: String,
        user_id: String,
        at: DateTime<Utc>,
    },
    MemberLeft {
        team_id: String,
        user_id: String,
        at: DateTime<Utc>,
    },
    MemberUpdated {
        team_id: String,
        member_id: String,
        updated_by: String,
        at: DateTime<Utc>,
    },
    MemberRemoved {
        team_id: String,
        member_id: String,
        removed_by: String,
        at: DateTime<Utc>,
    },
    OwnershipTransferred {
        team_id: String,
        from_user_id: String,
        to_user_id: String,
        at: DateTime<Utc>,
    },

    // organisation
    ProjectAddedToOrganisation {
        project_id: String,
        organisation_id: String,
        at: DateTime<Utc>,
    },
    ProjectRemovedFromOrganisation {
        project_id: String,
        organisation_id: String,
        at: DateTime<Utc>,
    },

    // denials
    AccessDenied {
        user_id: Option<String>,
        resource_id: String,
        reason: String,
        at: DateTime<Utc>,
    },
}

impl TeamEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MemberInvited { .. } => "team.member.invited",
            Self::InviteAccepted { .. } => "team.member.invite_accepted",
            Self::MemberLeft { .. } => "team.member.left",
            Self::MemberUpdated { .. } => "team.member.updated",
            Self::MemberRemoved { .. } => "team.member.removed",
            Self::OwnershipTransferred { .. } => "team.ownership.transferred",
            Self::ProjectAddedToOrganisation { .. } => "organisation.project.added",
            Self::ProjectRemovedFromOrganisation { .. } => "organisation.project.removed",
            Self::AccessDenied { .. } => "access.denied",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::MemberInvited { at, .. }
            | Self::InviteAccepted { at, .. }
            | Self::MemberLeft { at, .. }
            | Self::MemberUpdated { at, .. }
            | Self::MemberRemoved { at, .. }
            | Self::OwnershipTransferred { at, .. }
            | Self::ProjectAddedToOrganisation { at, .. }
            | Self::ProjectRemovedFromOrganisation { at, .. }
            | Self::AccessDenied { at, .. } => *at,
        }
    }
}
