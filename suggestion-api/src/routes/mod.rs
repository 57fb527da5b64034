mod auth;
mod suggestions;

use axum::{
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use suggestion_app::AppContext;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/suggestions",
            get(suggestions::list).post(suggestions::create),
        )
        .route(
            "/api/suggestions/{id}",
            get(suggestions::show)
                .patch(suggestions::update)
                .delete(suggestions::remove),
        )
        .route("/api/suggestions/{id}/vote", put(suggestions::vote))
}

pub fn auth_routes() -> Router<AppContext> {
    Router::new()
        .route("/auth/discord", get(auth::login))
        .route("/auth/discord/callback", get(auth::callback))
        .route("/auth/user", get(auth::current_user))
        .route("/auth/logout", get(auth::logout))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "Server is running" }))
}
