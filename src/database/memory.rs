use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Member, MemberLocation, MemberStatus, Tenant};
use crate::database::repository::{
    MemberLocationRepository, MemberRepository, MemberStatusRepository, ReadSnapshot, SnapshotSource,
    TenantRepository,
};
use crate::types::{MemberId, TenantId};

#[derive(Debug, Clone, Default)]
struct MemoryData {
    tenants: Vec<Tenant>,
    members: Vec<Member>,
    statuses: Vec<MemberStatus>,
    locations: Vec<MemberLocation>,
}

/// In-process storage backend. Members are listed in insertion order.
/// Each snapshot is a private copy taken under the read lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_tenant(&self, tenant: Tenant) {
        let mut data = self.data.write().await;
        data.tenants.retain(|t| t.id != tenant.id);
        data.tenants.push(tenant);
    }

    pub async fn insert_member(&self, member: Member) {
        let mut data = self.data.write().await;
        data.members.retain(|m| m.id != member.id);
        data.members.push(member);
    }

    /// Replace the member's status, keeping at most one per member
    pub async fn put_status(&self, status: MemberStatus) {
        let mut data = self.data.write().await;
        data.statuses.retain(|s| s.member_id != status.member_id);
        data.statuses.push(status);
    }

    /// Replace the member's location, keeping at most one per member
    pub async fn put_location(&self, location: MemberLocation) {
        let mut data = self.data.write().await;
        data.locations.retain(|l| l.member_id != location.member_id);
        data.locations.push(location);
    }

    /// Seed two small tenants for local development
    pub async fn seed_demo(&self) -> Vec<Tenant> {
        let now = Utc::now();
        let tenants = vec![
            Tenant {
                id: Uuid::new_v4(),
                name: "north-station".to_string(),
                created_at: now,
                updated_at: now,
            },
            Tenant {
                id: Uuid::new_v4(),
                name: "south-station".to_string(),
                created_at: now,
                updated_at: now,
            },
        ];

        let roster = [
            ("Aino", "Virtanen", Some("ALPHA-1"), Some("available"), true),
            ("Mikko", "Korhonen", Some("ALPHA-2"), None, true),
            ("Liisa", "Nieminen", None, Some("off duty"), false),
        ];

        for tenant in &tenants {
            self.insert_tenant(tenant.clone()).await;
            for (i, (first, last, call_sign, status, located)) in roster.iter().enumerate() {
                let member = Member {
                    id: Uuid::new_v4(),
                    tenant_id: tenant.id,
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    call_sign: call_sign.map(str::to_string),
                    email: None,
                    created_at: now,
                    updated_at: now,
                };
                if let Some(status) = status {
                    self.put_status(MemberStatus {
                        member_id: member.id,
                        status: status.to_string(),
                        message: None,
                        reported_at: now - Duration::minutes(5 * i as i64),
                    })
                    .await;
                }
                if *located {
                    self.put_location(MemberLocation {
                        member_id: member.id,
                        latitude: 60.45 + 0.01 * i as f64,
                        longitude: 22.26 - 0.01 * i as f64,
                        accuracy_meters: Some(15.0),
                        reported_at: now - Duration::minutes(2),
                    })
                    .await;
                }
                self.insert_member(member).await;
            }
        }

        tenants
    }
}

#[async_trait]
impl SnapshotSource for MemoryStore {
    async fn begin_read(&self) -> Result<Box<dyn ReadSnapshot>, DatabaseError> {
        let data = self.data.read().await.clone();
        Ok(Box::new(MemorySnapshot { data }))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub struct MemorySnapshot {
    data: MemoryData,
}

fn id_set(members: &[Member]) -> HashSet<MemberId> {
    members.iter().map(|m| m.id).collect()
}

#[async_trait]
impl TenantRepository for MemorySnapshot {
    async fn find_tenant(&mut self, tenant_id: TenantId) -> Result<Option<Tenant>, DatabaseError> {
        Ok(self.data.tenants.iter().find(|t| t.id == tenant_id).cloned())
    }
}

#[async_trait]
impl MemberRepository for MemorySnapshot {
    async fn find_by_tenant(&mut self, tenant: &Tenant) -> Result<Vec<Member>, DatabaseError> {
        Ok(self
            .data
            .members
            .iter()
            .filter(|m| m.tenant_id == tenant.id)
            .cloned()
            .collect())
    }

    async fn resolve(&mut self, tenant: &Tenant, member_id: MemberId) -> Result<Option<Member>, DatabaseError> {
        Ok(self
            .data
            .members
            .iter()
            .find(|m| m.id == member_id && m.tenant_id == tenant.id)
            .cloned())
    }
}

#[async_trait]
impl MemberStatusRepository for MemorySnapshot {
    async fn find_status_by_member(&mut self, member: &Member) -> Result<Option<MemberStatus>, DatabaseError> {
        Ok(self.data.statuses.iter().find(|s| s.member_id == member.id).cloned())
    }

    async fn find_statuses_by_member_in(&mut self, members: &[Member]) -> Result<Vec<MemberStatus>, DatabaseError> {
        let ids = id_set(members);
        Ok(self
            .data
            .statuses
            .iter()
            .filter(|s| ids.contains(&s.member_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MemberLocationRepository for MemorySnapshot {
    async fn find_location_by_member(&mut self, member: &Member) -> Result<Option<MemberLocation>, DatabaseError> {
        Ok(self.data.locations.iter().find(|l| l.member_id == member.id).cloned())
    }

    async fn find_locations_by_member_in(&mut self, members: &[Member]) -> Result<Vec<MemberLocation>, DatabaseError> {
        let ids = id_set(members);
        Ok(self
            .data
            .locations
            .iter()
            .filter(|l| ids.contains(&l.member_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReadSnapshot for MemorySnapshot {
    async fn close(self: Box<Self>) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{location, member, status, tenant};

    #[tokio::test]
    async fn snapshot_ignores_later_writes() {
        let store = MemoryStore::new();
        let t = tenant("alpha");
        store.insert_tenant(t.clone()).await;
        store.insert_member(member(&t, "Aino")).await;

        let mut snapshot = store.begin_read().await.unwrap();
        store.insert_member(member(&t, "Mikko")).await;

        assert_eq!(snapshot.find_by_tenant(&t).await.unwrap().len(), 1);
        snapshot.close().await.unwrap();

        let mut fresh = store.begin_read().await.unwrap();
        assert_eq!(fresh.find_by_tenant(&t).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn resolve_rejects_foreign_member() {
        let store = MemoryStore::new();
        let a = tenant("alpha");
        let b = tenant("bravo");
        let m = member(&b, "Liisa");
        store.insert_tenant(a.clone()).await;
        store.insert_tenant(b.clone()).await;
        store.insert_member(m.clone()).await;

        let mut snapshot = store.begin_read().await.unwrap();
        assert!(snapshot.resolve(&a, m.id).await.unwrap().is_none());
        assert_eq!(snapshot.resolve(&b, m.id).await.unwrap(), Some(m));
    }

    #[tokio::test]
    async fn put_status_keeps_one_per_member() {
        let store = MemoryStore::new();
        let t = tenant("alpha");
        let m = member(&t, "Aino");
        store.put_status(status(&m, "available")).await;
        store.put_status(status(&m, "busy")).await;
        store.put_location(location(&m)).await;

        let mut snapshot = store.begin_read().await.unwrap();
        let statuses = snapshot.find_statuses_by_member_in(&[m.clone()]).await.unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].status, "busy");
        assert!(snapshot.find_location_by_member(&m).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn demo_seed_populates_two_tenants() {
        let store = MemoryStore::new();
        let tenants = store.seed_demo().await;
        assert_eq!(tenants.len(), 2);

        let mut snapshot = store.begin_read().await.unwrap();
        for t in &tenants {
            assert_eq!(snapshot.find_by_tenant(t).await.unwrap().len(), 3);
        }
    }
}
