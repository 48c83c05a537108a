use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::MemberId;

/// Latest reported position of a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MemberLocation {
    pub member_id: MemberId,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
    pub reported_at: DateTime<Utc>,
}
