use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::role::{UnknownRole, UserRole};
use crate::types::{TenantId, UserId};

/// One role held by a caller. Tenant-specific roles carry the tenant they
/// were granted for; a global role's `tenant` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantId>,
}

impl RoleGrant {
    pub fn global(role: UserRole) -> Self {
        Self { role, tenant: None }
    }

    pub fn for_tenant(role: UserRole, tenant: TenantId) -> Self {
        Self { role, tenant: Some(tenant) }
    }

    /// Whether this grant confers `self.role` on a request addressing `tenant`.
    pub fn applies_to(&self, tenant: Option<&TenantId>) -> bool {
        if !self.role.is_tenant_specific() {
            return true;
        }
        match (self.tenant.as_ref(), tenant) {
            (Some(granted), Some(requested)) => granted == requested,
            _ => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrantParseError {
    #[error(transparent)]
    Role(#[from] UnknownRole),
    #[error("invalid tenant id '{0}'")]
    Tenant(String),
    #[error("role '{0}' is tenant specific and needs a tenant (ROLE:TENANT)")]
    MissingTenant(UserRole),
}

/// Parses `ROLE` or `ROLE:TENANT_UUID`, as accepted by the `token` command.
impl FromStr for RoleGrant {
    type Err = GrantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, tenant) = match s.split_once(':') {
            Some((role, tenant)) => (role, Some(tenant)),
            None => (s, None),
        };
        let role: UserRole = role.parse()?;
        let tenant = tenant
            .map(|t| t.trim().parse::<TenantId>().map_err(|_| GrantParseError::Tenant(t.to_string())))
            .transpose()?;

        if role.is_tenant_specific() && tenant.is_none() {
            return Err(GrantParseError::MissingTenant(role));
        }
        Ok(Self { role, tenant })
    }
}

/// The authenticated caller of a request, as established by the JWT
/// middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: UserId,
    pub user: String,
    pub grants: Vec<RoleGrant>,
}

impl Caller {
    pub fn new(user_id: UserId, user: impl Into<String>, grants: Vec<RoleGrant>) -> Self {
        Self {
            user_id,
            user: user.into(),
            grants,
        }
    }

    pub fn holds(&self, role: UserRole) -> bool {
        self.grants.iter().any(|g| g.role == role)
    }
}
