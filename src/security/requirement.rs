use serde::Serialize;
use std::collections::BTreeSet;

use super::role::UserRole;

/// The set of roles any one of which admits a caller to an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessRequirement {
    roles: BTreeSet<UserRole>,
}

impl AccessRequirement {
    pub fn any_of(roles: impl IntoIterator<Item = UserRole>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = UserRole> + '_ {
        self.roles.iter().copied()
    }

    pub fn contains(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// True when at least one acceptable role needs a tenant to be checked.
    pub fn is_tenant_scoped(&self) -> bool {
        self.roles.iter().any(UserRole::is_tenant_specific)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_duplicates() {
        let req = AccessRequirement::any_of([UserRole::TenantUser, UserRole::TenantUser, UserRole::Sysadmin]);
        assert_eq!(req.roles().count(), 2);
        assert!(req.contains(UserRole::Sysadmin));
        assert!(!req.contains(UserRole::TenantAdmin));
    }

    #[test]
    fn tenant_scoped_when_any_role_is_tenant_specific() {
        assert!(!AccessRequirement::any_of([UserRole::Sysadmin]).is_tenant_scoped());
        assert!(AccessRequirement::any_of([UserRole::Sysadmin, UserRole::TenantUser]).is_tenant_scoped());
        assert!(!AccessRequirement::default().is_tenant_scoped());
    }
}
