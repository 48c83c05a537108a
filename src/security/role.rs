use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Capability tags a caller can be granted.
///
/// Tenant-specific roles only mean something together with the tenant they
/// were granted for; global roles apply to every tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Sysadmin,
    TenantAdmin,
    TenantUser,
}

impl UserRole {
    pub fn is_tenant_specific(&self) -> bool {
        match self {
            UserRole::Sysadmin => false,
            UserRole::TenantAdmin | UserRole::TenantUser => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Sysadmin => "sysadmin",
            UserRole::TenantAdmin => "tenant_admin",
            UserRole::TenantUser => "tenant_user",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sysadmin" => Ok(UserRole::Sysadmin),
            "tenant_admin" => Ok(UserRole::TenantAdmin),
            "tenant_user" => Ok(UserRole::TenantUser),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
