mod accept;
mod context;
mod edit_member;
mod invite;
mod leave;
mod link_organisation;
mod remove_member;
mod transfer_ownership;
mod view_project;

#[cfg(test)]
mod testing;

pub use accept::AcceptInviteAction;
pub use context::{
    Caller, MembershipLoader, OrganisationContext, ProjectContext, TeamAbility, TeamContext,
};
pub use edit_member::{EditMemberAction, EditMemberInput};
pub use invite::{InviteMemberAction, InviteMemberInput};
pub use leave::LeaveTeamAction;
pub use link_organisation::{
    AddProjectToOrganisationAction, RemoveProjectFromOrganisationAction, INHERITED_OWNER_ROLE,
};
pub use remove_member::RemoveMemberAction;
pub use transfer_ownership::TransferOwnershipAction;
pub use view_project::{ProjectView, ViewProjectAction};
