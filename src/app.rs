use axum::{
    http::{header::AUTHORIZATION, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::repository::SnapshotSource;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::services::MemberSummaryService;

/// Shared by all handlers; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub summaries: MemberSummaryService,
}

impl AppState {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            summaries: MemberSummaryService::new(source),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // Protected API
        .merge(auth_routes())
        .merge(member_routes())
        .with_state(state);

    let router = match cors_layer() {
        Some(cors) => router.layer(cors),
        None => router,
    };

    if config::config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn auth_routes() -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::session_whoami))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn member_routes() -> Router<AppState> {
    use handlers::protected::members;

    Router::new()
        // Tenant-wide summaries
        .route("/api/tenants/:tenant/members/summary", get(members::member_summaries_get))
        // Single member summary
        .route(
            "/api/tenants/:tenant/members/:member/summary",
            get(members::member_summary_get),
        )
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> Option<CorsLayer> {
    let security = &config::config().security;
    if !security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET])
            .allow_headers([AUTHORIZATION]),
    )
}

/// Serve the API on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app(state)).await
}
