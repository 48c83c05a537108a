//! Fixture builders and a scripted snapshot for unit tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Member, MemberLocation, MemberStatus, Tenant};
use crate::database::repository::{
    MemberLocationRepository, MemberRepository, MemberStatusRepository, ReadSnapshot, TenantRepository,
};
use crate::security::{Caller, RoleGrant, UserRole};
use crate::types::{MemberId, TenantId};

pub fn tenant(name: &str) -> Tenant {
    let now = Utc::now();
    Tenant {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn member(tenant: &Tenant, first_name: &str) -> Member {
    let now = Utc::now();
    Member {
        id: Uuid::new_v4(),
        tenant_id: tenant.id,
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        call_sign: None,
        email: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn status(member: &Member, value: &str) -> MemberStatus {
    MemberStatus {
        member_id: member.id,
        status: value.to_string(),
        message: None,
        reported_at: Utc::now(),
    }
}

pub fn location(member: &Member) -> MemberLocation {
    MemberLocation {
        member_id: member.id,
        latitude: 60.1699,
        longitude: 24.9384,
        accuracy_meters: Some(10.0),
        reported_at: Utc::now(),
    }
}

pub fn sysadmin() -> Caller {
    Caller::new(Uuid::new_v4(), "root", vec![RoleGrant::global(UserRole::Sysadmin)])
}

pub fn tenant_user(tenant: TenantId) -> Caller {
    Caller::new(Uuid::new_v4(), "user", vec![RoleGrant::for_tenant(UserRole::TenantUser, tenant)])
}

/// Counts lookups issued against a [`ScriptedSnapshot`].
#[derive(Debug, Default)]
pub struct LookupCounter {
    pub single: AtomicUsize,
    pub bulk: AtomicUsize,
}

impl LookupCounter {
    pub fn single(&self) -> usize {
        self.single.load(Ordering::SeqCst)
    }

    pub fn bulk(&self) -> usize {
        self.bulk.load(Ordering::SeqCst)
    }
}

/// A snapshot that returns exactly what it was given, without filtering
/// bulk results by the requested member set. Used to exercise stores that
/// hand back stray or duplicated rows.
#[derive(Debug, Default)]
pub struct ScriptedSnapshot {
    pub tenants: Vec<Tenant>,
    pub members: Vec<Member>,
    pub statuses: Vec<MemberStatus>,
    pub locations: Vec<MemberLocation>,
    pub counter: Arc<LookupCounter>,
}

#[async_trait]
impl TenantRepository for ScriptedSnapshot {
    async fn find_tenant(&mut self, tenant_id: TenantId) -> Result<Option<Tenant>, DatabaseError> {
        Ok(self.tenants.iter().find(|t| t.id == tenant_id).cloned())
    }
}

#[async_trait]
impl MemberRepository for ScriptedSnapshot {
    async fn find_by_tenant(&mut self, tenant: &Tenant) -> Result<Vec<Member>, DatabaseError> {
        Ok(self.members.iter().filter(|m| m.tenant_id == tenant.id).cloned().collect())
    }

    async fn resolve(&mut self, tenant: &Tenant, member_id: MemberId) -> Result<Option<Member>, DatabaseError> {
        Ok(self
            .members
            .iter()
            .find(|m| m.id == member_id && m.tenant_id == tenant.id)
            .cloned())
    }
}

#[async_trait]
impl MemberStatusRepository for ScriptedSnapshot {
    async fn find_status_by_member(&mut self, member: &Member) -> Result<Option<MemberStatus>, DatabaseError> {
        self.counter.single.fetch_add(1, Ordering::SeqCst);
        Ok(self.statuses.iter().find(|s| s.member_id == member.id).cloned())
    }

    async fn find_statuses_by_member_in(&mut self, _members: &[Member]) -> Result<Vec<MemberStatus>, DatabaseError> {
        self.counter.bulk.fetch_add(1, Ordering::SeqCst);
        Ok(self.statuses.clone())
    }
}

#[async_trait]
impl MemberLocationRepository for ScriptedSnapshot {
    async fn find_location_by_member(&mut self, member: &Member) -> Result<Option<MemberLocation>, DatabaseError> {
        self.counter.single.fetch_add(1, Ordering::SeqCst);
        Ok(self.locations.iter().find(|l| l.member_id == member.id).cloned())
    }

    async fn find_locations_by_member_in(&mut self, _members: &[Member]) -> Result<Vec<MemberLocation>, DatabaseError> {
        self.counter.bulk.fetch_add(1, Ordering::SeqCst);
        Ok(self.locations.clone())
    }
}

#[async_trait]
impl ReadSnapshot for ScriptedSnapshot {
    async fn close(self: Box<Self>) -> Result<(), DatabaseError> {
        Ok(())
    }
}
