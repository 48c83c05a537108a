/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TenantId = Uuid;
pub type MemberId = Uuid;
pub type UserId = Uuid;

/// Operations exposed at the HTTP boundary. Each one carries its own
/// access requirement, see [`crate::security::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    MemberSummary,
    MemberSummaries,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::MemberSummary => "member_summary",
            Operation::MemberSummaries => "member_summaries",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
