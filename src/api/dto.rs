//! Wire projections of the summary types.
//!
//! Absent status or location serialize as `null` rather than being omitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{Member, MemberLocation, MemberStatus};
use crate::services::MemberSummary;
use crate::types::{MemberId, TenantId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: MemberId,
    pub tenant: TenantId,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub call_sign: Option<String>,
    pub email: Option<String>,
}

impl From<Member> for MemberDto {
    fn from(member: Member) -> Self {
        Self {
            display_name: member.display_name(),
            id: member.id,
            tenant: member.tenant_id,
            first_name: member.first_name,
            last_name: member.last_name,
            call_sign: member.call_sign,
            email: member.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStatusDto {
    pub status: String,
    pub message: Option<String>,
    pub reported_at: DateTime<Utc>,
}

impl From<MemberStatus> for MemberStatusDto {
    fn from(status: MemberStatus) -> Self {
        Self {
            status: status.status,
            message: status.message,
            reported_at: status.reported_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberLocationDto {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
    pub reported_at: DateTime<Utc>,
}

impl From<MemberLocation> for MemberLocationDto {
    fn from(location: MemberLocation) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            accuracy_meters: location.accuracy_meters,
            reported_at: location.reported_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSummaryDto {
    pub member: MemberDto,
    pub status: Option<MemberStatusDto>,
    pub location: Option<MemberLocationDto>,
}

impl From<MemberSummary> for MemberSummaryDto {
    fn from(summary: MemberSummary) -> Self {
        Self {
            member: summary.member.into(),
            status: summary.status.map(Into::into),
            location: summary.location.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{member, status, tenant};

    #[test]
    fn absent_records_serialize_as_null() {
        let t = tenant("alpha");
        let dto = MemberSummaryDto::from(MemberSummary {
            member: member(&t, "Aino"),
            status: None,
            location: None,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json["status"].is_null());
        assert!(json["location"].is_null());
        assert!(json.as_object().unwrap().contains_key("status"));
        assert_eq!(json["member"]["display_name"], "Aino Tester");
    }

    #[test]
    fn status_projection_drops_member_id() {
        let t = tenant("alpha");
        let m = member(&t, "Aino");
        let json = serde_json::to_value(MemberStatusDto::from(status(&m, "available"))).unwrap();
        assert_eq!(json["status"], "available");
        assert!(json.get("member_id").is_none());
    }
}
