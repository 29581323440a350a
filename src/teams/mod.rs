pub mod actions;
mod evaluator;
mod membership;
mod permission_set;
mod permissions;
mod repository;
mod traits;
mod types;
mod visibility;

pub use actions::{
    AcceptInviteAction, AddProjectToOrganisationAction, EditMemberAction, EditMemberInput,
    InviteMemberAction, InviteMemberInput, LeaveTeamAction, MembershipLoader, ProjectView,
    RemoveMemberAction, RemoveProjectFromOrganisationAction, TransferOwnershipAction,
    ViewProjectAction, INHERITED_OWNER_ROLE,
};
pub use evaluator::{has_org_permission, has_permission, AccessPolicy};
pub use membership::{
    combine_members, resolve_effective_member, resolve_member, EffectiveMember, MemberSource,
};
pub use permission_set::{PermissionSet, PermissionSetBuilder};
pub use permissions::{GlobalRole, OrganisationPermission, ProjectPermission};
pub use repository::{
    CreateMember, MemberRepository, OrganisationRepository, ProjectRepository, TeamRepository,
    UpdateMember,
};
pub use traits::Permission;
pub use types::{
    Member, MemberStatus, Organisation, Project, PublishingStatus, Team, TeamOwner, Viewer,
    Visibility,
};
pub use visibility::{is_project_accessible, project_access, ProjectAccess};

#[cfg(any(test, feature = "mocks"))]
mod mocks;

#[cfg(any(test, feature = "mocks"))]
pub use mocks::{
    MockMemberRepository, MockOrganisationRepository, MockProjectRepository, MockTeamRepository,
};
