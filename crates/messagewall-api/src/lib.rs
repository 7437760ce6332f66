pub mod error;
pub mod messages;
pub mod middleware;
pub mod rate_limit;
pub mod validation;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::get,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use messagewall_db::Database;
use messagewall_types::api::HealthResponse;

use crate::rate_limit::RateLimiter;

/// Request bodies larger than this are refused with 413.
pub const MAX_BODY_BYTES: usize = 10 * 1024;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub rate_limiter: RateLimiter,
}

impl AppStateInner {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            rate_limiter: RateLimiter::default(),
        }
    }
}

/// Builds the full HTTP surface: routes, identity cookie, body limit, CORS and tracing.
///
/// Only `cors_origin` may make cross-origin requests, and it may send cookies.
pub fn router(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(cors_origin))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route("/api/my-messages", get(messages::list_my_messages))
        .layer(axum::middleware::from_fn(middleware::assign_identity))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
