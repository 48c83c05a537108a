use axum::{
    extract::{Path, State},
    Extension,
};
use uuid::Uuid;

use crate::api::MemberSummaryDto;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::security::Caller;

/// Path identifiers that do not parse address nothing. An unparseable tenant
/// is an unresolved tenant for the access check.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// GET /api/tenants/:tenant/members/:member/summary
pub async fn member_summary_get(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((tenant, member)): Path<(String, String)>,
) -> ApiResult<MemberSummaryDto> {
    let summary = state
        .summaries
        .member_summary(&caller, parse_id(&tenant), parse_id(&member))
        .await?;

    Ok(ApiResponse::success(summary.into()))
}

/// GET /api/tenants/:tenant/members/summary
pub async fn member_summaries_get(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(tenant): Path<String>,
) -> ApiResult<Vec<MemberSummaryDto>> {
    let summaries = state.summaries.member_summaries(&caller, parse_id(&tenant)).await?;

    Ok(ApiResponse::success(summaries.into_iter().map(Into::into).collect()))
}
