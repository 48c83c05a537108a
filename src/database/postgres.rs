use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Member, MemberLocation, MemberStatus, Tenant};
use crate::database::repository::{
    member_ids, MemberLocationRepository, MemberRepository, MemberStatusRepository, ReadSnapshot, SnapshotSource,
    TenantRepository,
};
use crate::types::{MemberId, TenantId};

const TENANT_COLUMNS: &str = "id, name, created_at, updated_at";
const MEMBER_COLUMNS: &str = "id, tenant_id, first_name, last_name, call_sign, email, created_at, updated_at";
const STATUS_COLUMNS: &str = "member_id, status, message, reported_at";
const LOCATION_COLUMNS: &str = "member_id, latitude, longitude, accuracy_meters, reported_at";

fn log_query(sql: &str) {
    if config::config().database.enable_query_logging {
        debug!(sql, "executing query");
    }
}

/// Opens `REPEATABLE READ, READ ONLY` transactions on a PostgreSQL pool.
#[derive(Clone)]
pub struct PgSnapshotSource {
    pool: PgPool,
}

impl PgSnapshotSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a source on the shared pool from `DATABASE_URL`
    pub async fn connect() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }
}

#[async_trait]
impl SnapshotSource for PgSnapshotSource {
    async fn begin_read(&self) -> Result<Box<dyn ReadSnapshot>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(Box::new(PgSnapshot { tx }))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub struct PgSnapshot {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TenantRepository for PgSnapshot {
    async fn find_tenant(&mut self, tenant_id: TenantId) -> Result<Option<Tenant>, DatabaseError> {
        let sql = format!("SELECT {} FROM tenants WHERE id = $1", TENANT_COLUMNS);
        log_query(&sql);
        let tenant = sqlx::query_as::<_, Tenant>(&sql)
            .bind(tenant_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(tenant)
    }
}

#[async_trait]
impl MemberRepository for PgSnapshot {
    async fn find_by_tenant(&mut self, tenant: &Tenant) -> Result<Vec<Member>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM members WHERE tenant_id = $1 ORDER BY last_name, first_name, id",
            MEMBER_COLUMNS
        );
        log_query(&sql);
        let members = sqlx::query_as::<_, Member>(&sql)
            .bind(tenant.id)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(members)
    }

    async fn resolve(&mut self, tenant: &Tenant, member_id: MemberId) -> Result<Option<Member>, DatabaseError> {
        let sql = format!("SELECT {} FROM members WHERE tenant_id = $1 AND id = $2", MEMBER_COLUMNS);
        log_query(&sql);
        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(tenant.id)
            .bind(member_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(member)
    }
}

#[async_trait]
impl MemberStatusRepository for PgSnapshot {
    async fn find_status_by_member(&mut self, member: &Member) -> Result<Option<MemberStatus>, DatabaseError> {
        let sql = format!("SELECT {} FROM member_statuses WHERE member_id = $1", STATUS_COLUMNS);
        log_query(&sql);
        let status = sqlx::query_as::<_, MemberStatus>(&sql)
            .bind(member.id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(status)
    }

    async fn find_statuses_by_member_in(&mut self, members: &[Member]) -> Result<Vec<MemberStatus>, DatabaseError> {
        if members.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {} FROM member_statuses WHERE member_id = ANY($1)", STATUS_COLUMNS);
        log_query(&sql);
        let statuses = sqlx::query_as::<_, MemberStatus>(&sql)
            .bind(member_ids(members))
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(statuses)
    }
}

#[async_trait]
impl MemberLocationRepository for PgSnapshot {
    async fn find_location_by_member(&mut self, member: &Member) -> Result<Option<MemberLocation>, DatabaseError> {
        let sql = format!("SELECT {} FROM member_locations WHERE member_id = $1", LOCATION_COLUMNS);
        log_query(&sql);
        let location = sqlx::query_as::<_, MemberLocation>(&sql)
            .bind(member.id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(location)
    }

    async fn find_locations_by_member_in(&mut self, members: &[Member]) -> Result<Vec<MemberLocation>, DatabaseError> {
        if members.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {} FROM member_locations WHERE member_id = ANY($1)", LOCATION_COLUMNS);
        log_query(&sql);
        let locations = sqlx::query_as::<_, MemberLocation>(&sql)
            .bind(member_ids(members))
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(locations)
    }
}

#[async_trait]
impl ReadSnapshot for PgSnapshot {
    async fn close(self: Box<Self>) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }
}
