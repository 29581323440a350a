//! Membership resolution across a project team and its organisation team.

use std::collections::HashSet;
use std::ops::Deref;

use super::types::Member;

/// Which team list a resolved record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSource {
    Project,
    Organisation,
}

/// A user's resolved membership for one project.
///
/// Derefs to the underlying [`Member`]. `is_owner` may be true even when the
/// record itself is not an owner: a direct project member who also owns the
/// project's organisation is treated as an owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveMember<'a> {
    pub member: &'a Member,
    pub source: MemberSource,
    pub is_owner: bool,
}

impl Deref for EffectiveMember<'_> {
    type Target = Member;

    fn deref(&self) -> &Member {
        self.member
    }
}

/// Find the user's membership record.
///
/// The project-team record always wins, even when the organisation record
/// grants more: a project-level record is a scoped override of the
/// organisation's defaults.
pub fn resolve_member<'a>(
    user_id: &str,
    project_members: &'a [Member],
    org_members: &'a [Member],
) -> Option<&'a Member> {
    project_members
        .iter()
        .find(|m| m.user_id == user_id)
        .or_else(|| org_members.iter().find(|m| m.user_id == user_id))
}

/// Like [`resolve_member`], but also reports where the record came from and
/// whether the user is effectively an owner.
///
/// A pending project record does not shadow an accepted organisation record:
/// until the invite is accepted, the organisation record is used.
pub fn resolve_effective_member<'a>(
    user_id: &str,
    project_members: &'a [Member],
    org_members: &'a [Member],
) -> Option<EffectiveMember<'a>> {
    let org_record = org_members.iter().find(|m| m.user_id == user_id);
    let project_record = project_members.iter().find(|m| m.user_id == user_id);

    let inherited = |member: &'a Member| EffectiveMember {
        member,
        source: MemberSource::Organisation,
        is_owner: member.is_owner,
    };

    match (project_record, org_record) {
        (Some(member), Some(org)) if member.is_pending() && org.is_accepted() => {
            Some(inherited(org))
        }
        (Some(member), org) => Some(EffectiveMember {
            member,
            source: MemberSource::Project,
            is_owner: member.is_owner || org.is_some_and(|m| m.is_owner && m.is_accepted()),
        }),
        (None, org) => org.map(inherited),
    }
}

/// Every distinct user's effective membership, project records first.
pub fn combine_members<'a>(
    project_members: &'a [Member],
    org_members: &'a [Member],
) -> Vec<EffectiveMember<'a>> {
    let mut seen = HashSet::new();
    let mut combined = Vec::new();

    for m in project_members.iter().chain(org_members) {
        if !seen.insert(m.user_id.as_str()) {
            continue;
        }
        if let Some(effective) = resolve_effective_member(&m.user_id, project_members, org_members)
        {
            combined.push(effective);
        }
    }

    combined
}
