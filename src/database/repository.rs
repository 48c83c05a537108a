//! Read-side storage contracts.
//!
//! Every lookup runs against a [`ReadSnapshot`], so that a member listing and
//! the status and location lookups that follow it observe the same state.

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Member, MemberLocation, MemberStatus, Tenant};
use crate::types::{MemberId, TenantId};

#[async_trait]
pub trait TenantRepository {
    async fn find_tenant(&mut self, tenant_id: TenantId) -> Result<Option<Tenant>, DatabaseError>;
}

#[async_trait]
pub trait MemberRepository {
    /// All members of `tenant`, in a stable listing order.
    async fn find_by_tenant(&mut self, tenant: &Tenant) -> Result<Vec<Member>, DatabaseError>;

    /// The member `member_id` if it exists and belongs to `tenant`.
    async fn resolve(&mut self, tenant: &Tenant, member_id: MemberId) -> Result<Option<Member>, DatabaseError>;
}

#[async_trait]
pub trait MemberStatusRepository {
    async fn find_status_by_member(&mut self, member: &Member) -> Result<Option<MemberStatus>, DatabaseError>;

    /// One entry per member in `members` that has a status.
    async fn find_statuses_by_member_in(&mut self, members: &[Member]) -> Result<Vec<MemberStatus>, DatabaseError>;
}

#[async_trait]
pub trait MemberLocationRepository {
    async fn find_location_by_member(&mut self, member: &Member) -> Result<Option<MemberLocation>, DatabaseError>;

    /// One entry per member in `members` that has a location.
    async fn find_locations_by_member_in(&mut self, members: &[Member]) -> Result<Vec<MemberLocation>, DatabaseError>;
}

/// A consistent, read-only view of storage held for one request.
#[async_trait]
pub trait ReadSnapshot:
    TenantRepository + MemberRepository + MemberStatusRepository + MemberLocationRepository + Send
{
    /// Release the snapshot after a successful read. Dropping a snapshot
    /// without closing it discards it as well.
    async fn close(self: Box<Self>) -> Result<(), DatabaseError>;
}

/// Opens snapshots. Shared across requests.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn begin_read(&self) -> Result<Box<dyn ReadSnapshot>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

pub(crate) fn member_ids(members: &[Member]) -> Vec<MemberId> {
    members.iter().map(|m| m.id).collect()
}
