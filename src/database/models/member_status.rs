use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::MemberId;

/// Latest reported status of a member. Written by whichever subsystem tracks
/// presence; this service only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MemberStatus {
    pub member_id: MemberId,
    pub status: String,
    pub message: Option<String>,
    pub reported_at: DateTime<Utc>,
}
