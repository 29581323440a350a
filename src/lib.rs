//! Access resolution for project and organisation teams.
//!
//! The core is three pure functions:
//!
//! - [`teams::resolve_member`] picks a user's membership record, preferring the
//!   direct project-team record over the owning organisation's record.
//! - [`teams::has_permission`] / [`teams::has_org_permission`] decide whether a
//!   member may perform an operation.
//! - [`teams::is_project_accessible`] decides whether a project may be shown to
//!   a viewer at all.
//!
//! Around the core, [`teams::actions`] load data through the repository traits,
//! call the core uniformly and fire [`events::TeamEvent`]s.

pub mod config;
pub mod events;
pub mod teams;
pub mod validators;

pub use config::{AccessConfig, RoleGrants, VisibilityConfig};
pub use events::{dispatch, register_event_listeners};
pub use validators::ValidationError;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AccessError {
    /// The record does not exist or the caller may not know it exists.
    NotFound,
    /// The caller can see the resource but lacks the required permission.
    Unauthorized(String),
    AlreadyMember,
    NoPendingInvite,
    OwnerCannotLeave,
    CannotRemoveOwner,
    InvalidRequest(String),
    Validation(ValidationError),
    DatabaseError(String),
    Internal(String),
}

impl AccessError {
    /// Returns true for errors that must be reported as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// HTTP status a calling layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Unauthorized(_) => 401,
            Self::AlreadyMember
            | Self::NoPendingInvite
            | Self::OwnerCannotLeave
            | Self::CannotRemoveOwner
            | Self::InvalidRequest(_)
            | Self::Validation(_) => 400,
            Self::DatabaseError(_) | Self::Internal(_) => 500,
        }
    }
}

impl std::error::Error for AccessError {}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Not found"),
            Self::Unauthorized(msg) => write!(f, "{msg}"),
            Self::AlreadyMember => write!(f, "User is already a member of this team"),
            Self::NoPendingInvite => write!(f, "No pending invite for this team"),
            Self::OwnerCannotLeave => write!(f, "You can't leave the team while you're the owner"),
            Self::CannotRemoveOwner => write!(f, "The team owner can't be removed"),
            Self::InvalidRequest(msg) => write!(f, "{msg}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl From<ValidationError> for AccessError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
