pub mod routes;
mod session;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use suggestion_app::AppContext;
use suggestion_errors::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

const SESSION_TTL_HOURS: i64 = 24;

/// Assembles the HTTP surface around an opened [`AppContext`].
pub fn build_router(ctx: AppContext) -> Result<Router, AppError> {
    build_router_with_store(ctx, MemoryStore::default())
}

/// Same as [`build_router`] but keeps sessions in the given store, so callers
/// can inspect or seed it.
pub fn build_router_with_store(ctx: AppContext, store: MemoryStore) -> Result<Router, AppError> {
    let origin = HeaderValue::from_str(&ctx.config.frontend_url)
        .map_err(|e| AppError::Internal(format!("FRONTEND_URL is not a valid origin: {}", e)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ]);

    let sessions = SessionManagerLayer::new(store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(SESSION_TTL_HOURS)));

    Ok(Router::new()
        .merge(routes::api_routes())
        .merge(routes::auth_routes())
        .with_state(ctx)
        .layer(sessions)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}
