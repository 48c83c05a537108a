use tracing::{debug, warn};

use super::caller::Caller;
use super::policy::requirement_for;
use super::requirement::AccessRequirement;
use super::role::UserRole;
use crate::config;
use crate::types::{Operation, TenantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("access to {operation} denied")]
    Denied { operation: Operation },
}

/// Decide whether `caller` satisfies `requirement` for a request addressing
/// `tenant`.
///
/// A requirement naming any tenant-specific role fails closed when no tenant
/// was resolved, even if the caller holds a global role from it. A held
/// global role from the requirement admits the caller anywhere. Otherwise
/// every required tenant-specific role the caller holds must be granted for
/// `tenant`.
pub fn decide(requirement: &AccessRequirement, caller: &Caller, tenant: Option<&TenantId>) -> Decision {
    if requirement.is_tenant_scoped() && tenant.is_none() {
        return Decision::Deny;
    }

    let held: Vec<UserRole> = requirement.roles().filter(|role| caller.holds(*role)).collect();
    if held.is_empty() {
        return Decision::Deny;
    }
    if held.iter().any(|role| !role.is_tenant_specific()) {
        return Decision::Allow;
    }

    let scoped = held.iter().all(|role| {
        caller
            .grants
            .iter()
            .any(|grant| grant.role == *role && grant.applies_to(tenant))
    });

    if scoped {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Evaluate the declared requirement of `operation` and turn a DENY into an
/// error.
pub fn authorize(operation: Operation, caller: &Caller, tenant: Option<&TenantId>) -> Result<(), AccessError> {
    let requirement = requirement_for(operation);

    match decide(&requirement, caller, tenant) {
        Decision::Allow => {
            debug!(user_id = %caller.user_id, %operation, tenant = ?tenant, "access granted");
            Ok(())
        }
        Decision::Deny => {
            if config::config().security.enable_audit_logging {
                warn!(user_id = %caller.user_id, user = %caller.user, %operation, tenant = ?tenant, "access denied");
            } else {
                debug!(user_id = %caller.user_id, %operation, tenant = ?tenant, "access denied");
            }
            Err(AccessError::Denied { operation })
        }
    }
}
