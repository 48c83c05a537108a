use axum::Extension;
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::security::{Caller, RoleGrant};
use crate::types::UserId;

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub user_id: UserId,
    pub user: String,
    pub grants: Vec<RoleGrant>,
}

/// GET /api/auth/whoami - identity and role grants carried by the token
pub async fn whoami(Extension(caller): Extension<Caller>) -> ApiResult<WhoAmI> {
    Ok(ApiResponse::success(WhoAmI {
        user_id: caller.user_id,
        user: caller.user,
        grants: caller.grants,
    }))
}
