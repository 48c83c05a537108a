//! Role requirements of every exposed operation, kept in one table.

use super::requirement::AccessRequirement;
use super::role::UserRole;
use crate::types::Operation;

const MEMBER_READERS: &[UserRole] = &[UserRole::Sysadmin, UserRole::TenantAdmin, UserRole::TenantUser];

pub const POLICY: &[(Operation, &[UserRole])] = &[
    (Operation::MemberSummary, MEMBER_READERS),
    (Operation::MemberSummaries, MEMBER_READERS),
];

/// Requirement declared for `operation`. An operation missing from
/// [`POLICY`] gets an empty requirement, which nobody satisfies.
pub fn requirement_for(operation: Operation) -> AccessRequirement {
    POLICY
        .iter()
        .find(|(op, _)| *op == operation)
        .map(|(_, roles)| AccessRequirement::any_of(roles.iter().copied()))
        .unwrap_or_default()
}
