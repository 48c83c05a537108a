//! Member summaries: a member joined with its optional status and location.
//!
//! The bulk form issues one member listing plus one status and one location
//! lookup for the whole member set, then joins them through maps keyed by
//! member id.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::database::manager::DatabaseError;
use crate::database::models::{Member, MemberLocation, MemberStatus, Tenant};
use crate::database::repository::{MemberLocationRepository, MemberRepository, MemberStatusRepository, SnapshotSource};
use crate::security::{authorize, AccessError, Caller};
use crate::types::{MemberId, Operation, TenantId};

/// Built per read, never stored. `None` means storage holds no record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSummary {
    pub member: Member,
    pub status: Option<MemberStatus>,
    pub location: Option<MemberLocation>,
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("Member not found")]
    MemberNotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Summarize a single member of `tenant`.
pub async fn summarize<R>(reader: &mut R, tenant: &Tenant, member: Member) -> Result<MemberSummary, SummaryError>
where
    R: MemberStatusRepository + MemberLocationRepository + Send + ?Sized,
{
    if member.tenant_id != tenant.id {
        return Err(SummaryError::MemberNotFound);
    }

    let status = reader
        .find_status_by_member(&member)
        .await?
        .filter(|s| belongs_to(&member, s.member_id, "status"));
    let location = reader
        .find_location_by_member(&member)
        .await?
        .filter(|l| belongs_to(&member, l.member_id, "location"));

    Ok(MemberSummary { member, status, location })
}

/// Summarize every member of `tenant`, in member listing order.
pub async fn summarize_all<R>(reader: &mut R, tenant: &Tenant) -> Result<Vec<MemberSummary>, DatabaseError>
where
    R: MemberRepository + MemberStatusRepository + MemberLocationRepository + Send + ?Sized,
{
    let members = distinct_members(reader.find_by_tenant(tenant).await?, tenant);
    if members.is_empty() {
        return Ok(vec![]);
    }

    let known: HashSet<MemberId> = members.iter().map(|m| m.id).collect();
    let mut statuses = index_by_member(
        reader.find_statuses_by_member_in(&members).await?,
        &known,
        |s: &MemberStatus| s.member_id,
        "status",
    );
    let mut locations = index_by_member(
        reader.find_locations_by_member_in(&members).await?,
        &known,
        |l: &MemberLocation| l.member_id,
        "location",
    );

    let summaries: Vec<MemberSummary> = members
        .into_iter()
        .map(|member| MemberSummary {
            status: statuses.remove(&member.id),
            location: locations.remove(&member.id),
            member,
        })
        .collect();

    debug!(tenant_id = %tenant.id, count = summaries.len(), "built member summaries");
    Ok(summaries)
}

/// Drop repeated members (first occurrence wins) and members of other tenants.
fn distinct_members(listed: Vec<Member>, tenant: &Tenant) -> Vec<Member> {
    let mut seen = HashSet::with_capacity(listed.len());
    listed
        .into_iter()
        .filter(|m| {
            if m.tenant_id != tenant.id {
                warn!(member_id = %m.id, tenant_id = %tenant.id, "member listing returned a member of another tenant");
                return false;
            }
            seen.insert(m.id)
        })
        .collect()
}

fn index_by_member<T>(
    records: Vec<T>,
    known: &HashSet<MemberId>,
    key: impl Fn(&T) -> MemberId,
    kind: &'static str,
) -> HashMap<MemberId, T> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        let member_id = key(&record);
        if !known.contains(&member_id) {
            warn!(%member_id, kind, "dropping record for member outside the summarized set");
            continue;
        }
        if index.contains_key(&member_id) {
            debug!(%member_id, kind, "ignoring duplicate record");
            continue;
        }
        index.insert(member_id, record);
    }
    index
}

fn belongs_to(member: &Member, member_id: MemberId, kind: &'static str) -> bool {
    if member.id == member_id {
        return true;
    }
    warn!(member_id = %member.id, got = %member_id, kind, "dropping record for another member");
    false
}

/// Runs the read pipeline for the summary operations: authorize against the
/// addressed tenant, open a snapshot, resolve identifiers, aggregate.
#[derive(Clone)]
pub struct MemberSummaryService {
    source: Arc<dyn SnapshotSource>,
}

impl MemberSummaryService {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn SnapshotSource> {
        &self.source
    }

    pub async fn member_summary(
        &self,
        caller: &Caller,
        tenant_id: Option<TenantId>,
        member_id: Option<MemberId>,
    ) -> Result<MemberSummary, SummaryError> {
        authorize(Operation::MemberSummary, caller, tenant_id.as_ref())?;
        let tenant_id = tenant_id.ok_or(SummaryError::TenantNotFound)?;

        let mut snapshot = self.source.begin_read().await?;
        let tenant = snapshot
            .find_tenant(tenant_id)
            .await?
            .ok_or(SummaryError::TenantNotFound)?;
        let member_id = member_id.ok_or(SummaryError::MemberNotFound)?;
        let member = snapshot
            .resolve(&tenant, member_id)
            .await?
            .ok_or(SummaryError::MemberNotFound)?;

        let summary = summarize(snapshot.as_mut(), &tenant, member).await?;
        snapshot.close().await?;
        Ok(summary)
    }

    pub async fn member_summaries(
        &self,
        caller: &Caller,
        tenant_id: Option<TenantId>,
    ) -> Result<Vec<MemberSummary>, SummaryError> {
        authorize(Operation::MemberSummaries, caller, tenant_id.as_ref())?;
        let tenant_id = tenant_id.ok_or(SummaryError::TenantNotFound)?;

        let mut snapshot = self.source.begin_read().await?;
        let tenant = snapshot
            .find_tenant(tenant_id)
            .await?
            .ok_or(SummaryError::TenantNotFound)?;

        let summaries = summarize_all(snapshot.as_mut(), &tenant).await?;
        snapshot.close().await?;
        Ok(summaries)
    }
}
