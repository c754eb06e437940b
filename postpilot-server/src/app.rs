use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use postpilot_config::CorsConfig;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Uploads carry raw video; cap bodies at 50 MiB.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    build_router_with_cors(state, &CorsConfig {
        allowed_origins: Vec::new(),
        allow_all_origins: false,
    })
}

pub fn build_router_with_cors(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    let cors_layer = if cors.allow_all_origins {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/register", post(handlers::auth::register::register))
        .route("/api/login", post(handlers::auth::login::login))
        .route("/upload", post(handlers::uploads::create::create))
        .route(
            "/jobs/{user_id}/{job_id}/status",
            get(handlers::jobs::status::get_status),
        )
        .route("/createGroup", post(handlers::groups::create::create))
        .route(
            "/tiktok_session",
            post(handlers::groups::token::save_social_token),
        )
        .route("/trigger", post(handlers::dispatch::trigger::trigger))
        .route("/followers", post(handlers::dispatch::followers::followers))
        .route("/ai/deepseek", post(handlers::ai::deepseek::chat))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(Extension(state))
}
