#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use uuid::Uuid;

use rollcall_api::app::{self, AppState};
use rollcall_api::auth::{generate_jwt, Claims};
use rollcall_api::database::models::{Member, MemberLocation, MemberStatus, Tenant};
use rollcall_api::database::MemoryStore;
use rollcall_api::security::{RoleGrant, UserRole};

/// Tenant T1 holds M1 (status, no location), M2 (location, no status) and
/// M3 (neither). T2 holds one member with both. `empty` has no members.
pub struct Fixture {
    pub t1: Tenant,
    pub t2: Tenant,
    pub empty: Tenant,
    pub m1: Member,
    pub m2: Member,
    pub m3: Member,
    pub other: Member,
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub fixture: Fixture,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_as(&self, path: &str, grants: Vec<RoleGrant>) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token(grants)?)
            .send()
            .await?)
    }
}

fn tenant(name: &str) -> Tenant {
    let now = Utc::now();
    Tenant {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn member(tenant: &Tenant, first: &str, last: &str) -> Member {
    let now = Utc::now();
    Member {
        id: Uuid::new_v4(),
        tenant_id: tenant.id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        call_sign: None,
        email: None,
        created_at: now,
        updated_at: now,
    }
}

fn status(member: &Member, value: &str) -> MemberStatus {
    MemberStatus {
        member_id: member.id,
        status: value.to_string(),
        message: Some("on station".to_string()),
        reported_at: Utc::now() - Duration::minutes(3),
    }
}

fn location(member: &Member) -> MemberLocation {
    MemberLocation {
        member_id: member.id,
        latitude: 60.4518,
        longitude: 22.2666,
        accuracy_meters: Some(12.5),
        reported_at: Utc::now() - Duration::minutes(1),
    }
}

async fn seed(store: &MemoryStore) -> Fixture {
    let t1 = tenant("t1");
    let t2 = tenant("t2");
    let empty = tenant("empty");
    let m1 = member(&t1, "Aino", "Virtanen");
    let m2 = member(&t1, "Mikko", "Korhonen");
    let m3 = member(&t1, "Liisa", "Nieminen");
    let other = member(&t2, "Pekka", "Laine");

    for t in [&t1, &t2, &empty] {
        store.insert_tenant(t.clone()).await;
    }
    for m in [&m1, &m2, &m3, &other] {
        store.insert_member(m.clone()).await;
    }
    store.put_status(status(&m1, "available")).await;
    store.put_location(location(&m2)).await;
    store.put_status(status(&other, "busy")).await;
    store.put_location(location(&other)).await;

    Fixture { t1, t2, empty, m1, m2, m3, other }
}

/// Start the API on a free port, backed by a freshly seeded in-memory store.
pub async fn spawn_server() -> Result<TestServer> {
    let store = MemoryStore::new();
    let fixture = seed(&store).await;

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let state = AppState::new(Arc::new(store));
    tokio::spawn(async move {
        let _ = app::serve(listener, state).await;
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        fixture,
        client: reqwest::Client::new(),
    })
}

pub fn token(grants: Vec<RoleGrant>) -> Result<String> {
    let claims = Claims::new(Uuid::new_v4(), "tester".to_string(), grants);
    generate_jwt(&claims).context("failed to sign test token")
}

pub fn sysadmin() -> Vec<RoleGrant> {
    vec![RoleGrant::global(UserRole::Sysadmin)]
}

pub fn tenant_user(tenant: &Tenant) -> Vec<RoleGrant> {
    vec![RoleGrant::for_tenant(UserRole::TenantUser, tenant.id)]
}

pub fn tenant_admin(tenant: &Tenant) -> Vec<RoleGrant> {
    vec![RoleGrant::for_tenant(UserRole::TenantAdmin, tenant.id)]
}
