//! Tenant-aware role-based access control.
//!
//! Every exposed [`Operation`](crate::types::Operation) declares an
//! [`AccessRequirement`] in [`policy`]; [`evaluator::decide`] checks it
//! against the caller's role grants and the tenant addressed by the request.

pub mod caller;
pub mod evaluator;
pub mod policy;
pub mod requirement;
pub mod role;

pub use caller::{Caller, RoleGrant};
pub use evaluator::{authorize, decide, AccessError, Decision};
pub use requirement::AccessRequirement;
pub use role::UserRole;
