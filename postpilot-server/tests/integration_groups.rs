use std::sync::Arc;

use axum::http::{header, HeaderMap, StatusCode};
use axum::{Extension, Json};
use postpilot_auth::TestAuthenticator;
use postpilot_db::{create_pool, group_items, users, DbConnectionConfig};
use postpilot_dispatch::NoopBridge;
use postpilot_server::error::ApiError;
use postpilot_server::handlers::groups::{create::create, token::save_social_token};
use postpilot_server::state::AppState;
use serde_json::json;

/// Pool, schema, and one registered user (groups carry a foreign key on
/// users). Returns the state and the seeded user's id.
async fn setup() -> (Arc<AppState>, i64) {
    let cfg = DbConnectionConfig::new("sqlite::memory:").with_max_connections(1);
    let pool = create_pool(&cfg).await.expect("pool");
    postpilot_migrations::sqlite_migrator()
        .run(&pool)
        .await
        .expect("migrations");

    let owner = users::insert_user(
        &pool,
        "creator",
        "creator@example.com",
        "$argon2id$fake-hash",
        &chrono::Utc::now().to_rfc3339(),
    )
    .await
    .expect("seed user");

    let state = Arc::new(AppState::new(
        pool,
        Arc::new(TestAuthenticator::user(owner.id)),
        Arc::new(NoopBridge),
        None,
        "./uploads-test",
        "test-secret",
        24,
    ));
    (state, owner.id)
}

fn auth_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Bearer test-token".parse().unwrap());
    headers
}

async fn create_group(state: &Arc<AppState>, user_id: i64) -> i64 {
    let res = create(
        Extension(state.clone()),
        auth_headers(),
        Some(Json(json!({ "user_id": user_id, "name": "campaign" }))),
    )
    .await
    .expect("create group");
    res.0["id"].as_i64().expect("group id")
}

fn token_payload(user_id: i64, group_id: i64, token: &str) -> Json<serde_json::Value> {
    Json(json!({
        "user_id": user_id,
        "group_id": group_id,
        "type": "tiktok",
        "token": token,
    }))
}

#[tokio::test]
async fn create_group_then_store_token_round_trip() {
    let (state, owner) = setup().await;
    let group_id = create_group(&state, owner).await;

    let res = save_social_token(
        Extension(state.clone()),
        auth_headers(),
        Some(token_payload(owner, group_id, "tok123")),
    )
    .await
    .expect("save token");
    assert_eq!(res.0, StatusCode::CREATED);
    assert_eq!(res.1 .0["type"], "tiktok");

    let item = group_items::find_item(&state.db_pool, group_id, "tiktok")
        .await
        .expect("query")
        .expect("item");
    let data: serde_json::Value = serde_json::from_str(&item.data).expect("json payload");
    assert_eq!(data, json!({ "token": "tok123" }));
}

#[tokio::test]
async fn group_for_unknown_user_is_not_found() {
    let (state, owner) = setup().await;

    let err = create(
        Extension(state),
        auth_headers(),
        Some(Json(json!({ "user_id": owner + 1000, "name": "campaign" }))),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn second_write_replaces_the_whole_payload() {
    let (state, owner) = setup().await;
    let group_id = create_group(&state, owner).await;

    for token in ["first", "second"] {
        save_social_token(
            Extension(state.clone()),
            auth_headers(),
            Some(token_payload(owner, group_id, token)),
        )
        .await
        .expect("save token");
    }

    let item = group_items::find_item(&state.db_pool, group_id, "tiktok")
        .await
        .expect("query")
        .expect("item");
    let data: serde_json::Value = serde_json::from_str(&item.data).expect("json payload");
    assert_eq!(data, json!({ "token": "second" }));
}

#[tokio::test]
async fn concurrent_writes_leave_exactly_one_whole_payload() {
    let (state, owner) = setup().await;
    let group_id = create_group(&state, owner).await;

    let a = tokio::spawn({
        let state = state.clone();
        async move {
            save_social_token(
                Extension(state),
                auth_headers(),
                Some(token_payload(owner, group_id, "payload-a")),
            )
            .await
        }
    });
    let b = tokio::spawn({
        let state = state.clone();
        async move {
            save_social_token(
                Extension(state),
                auth_headers(),
                Some(token_payload(owner, group_id, "payload-b")),
            )
            .await
        }
    });

    a.await.expect("join").expect("save token a");
    b.await.expect("join").expect("save token b");

    let item = group_items::find_item(&state.db_pool, group_id, "tiktok")
        .await
        .expect("query")
        .expect("item");
    let data: serde_json::Value = serde_json::from_str(&item.data).expect("json payload");
    assert!(
        data == json!({ "token": "payload-a" }) || data == json!({ "token": "payload-b" }),
        "stored item must be one writer's whole payload, got {data}"
    );
}

#[tokio::test]
async fn token_for_missing_group_is_not_found() {
    let (state, owner) = setup().await;

    let err = save_social_token(
        Extension(state.clone()),
        auth_headers(),
        Some(token_payload(owner, 777, "tok123")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // nothing must be written for an unknown group
    let item = group_items::find_item(&state.db_pool, 777, "tiktok")
        .await
        .expect("query");
    assert!(item.is_none());
}

#[tokio::test]
async fn token_for_foreign_group_is_forbidden() {
    let (state, owner) = setup().await;
    let group_id = create_group(&state, owner).await;

    let err = save_social_token(
        Extension(state),
        auth_headers(),
        Some(token_payload(owner + 1, group_id, "tok123")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn blank_token_fields_are_rejected() {
    let (state, owner) = setup().await;
    let group_id = create_group(&state, owner).await;

    let err = save_social_token(
        Extension(state),
        auth_headers(),
        Some(token_payload(owner, group_id, "  ")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn group_routes_require_a_token() {
    let (state, owner) = setup().await;

    let err = create(
        Extension(state),
        HeaderMap::new(),
        Some(Json(json!({ "user_id": owner, "name": "campaign" }))),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Authentication(_)));
}
