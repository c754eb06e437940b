use std::sync::Arc;

use axum::{Extension, Json};
use postpilot_auth::TestAuthenticator;
use postpilot_db::{create_pool, DbConnectionConfig, JobStatus};
use postpilot_dispatch::{async_trait, DispatchBridge, DispatchError, JobHandoff, NoopBridge};
use postpilot_server::error::ApiError;
use postpilot_server::handlers::dispatch::{followers::followers, trigger::trigger};
use postpilot_server::state::AppState;
use serde_json::json;

/// Bridge that echoes the handoff it received.
struct EchoBridge;

#[async_trait]
impl DispatchBridge for EchoBridge {
    async fn dispatch(&self, handoff: &JobHandoff) -> Result<String, DispatchError> {
        Ok(format!(
            "{}:{}:{}",
            handoff.platform, handoff.session_id, handoff.headless
        ))
    }

    async fn poll_status(&self, _job_id: &str) -> Result<JobStatus, DispatchError> {
        Err(DispatchError::Unsupported("status polling"))
    }

    async fn collect_followers(&self, headless: bool) -> Result<String, DispatchError> {
        Ok(format!("followers:{headless}"))
    }
}

async fn setup(bridge: Arc<dyn DispatchBridge>) -> Arc<AppState> {
    let cfg = DbConnectionConfig::new("sqlite::memory:").with_max_connections(1);
    let pool = create_pool(&cfg).await.expect("pool");

    Arc::new(AppState::new(
        pool,
        Arc::new(TestAuthenticator::user(42)),
        bridge,
        None,
        "./uploads-test",
        "test-secret",
        24,
    ))
}

#[tokio::test]
async fn trigger_relays_worker_output() {
    let state = setup(Arc::new(EchoBridge)).await;

    let Json(res) = trigger(
        Extension(state),
        Some(Json(json!({
            "session_id": "sess-1",
            "video_path": "/tmp/clip.mp4",
            "caption": "hello",
            "headless": true,
        }))),
    )
    .await
    .expect("trigger");

    assert_eq!(res["success"], true);
    assert_eq!(res["output"], "tiktok:sess-1:true");
}

#[tokio::test]
async fn trigger_reports_every_missing_field() {
    let state = setup(Arc::new(EchoBridge)).await;

    let err = trigger(
        Extension(state),
        Some(Json(json!({ "session_id": "sess-1" }))),
    )
    .await
    .unwrap_err();

    match err {
        ApiError::Validation(details) => {
            let fields: Vec<&str> = details
                .as_array()
                .expect("issue list")
                .iter()
                .map(|i| i["field"].as_str().unwrap())
                .collect();
            assert_eq!(fields, vec!["video_path", "caption"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn followers_defaults_to_headless() {
    let state = setup(Arc::new(EchoBridge)).await;

    let Json(res) = followers(Extension(state), None).await.expect("followers");
    assert_eq!(res["output"], "followers:true");
}

#[tokio::test]
async fn unsupported_bridge_surfaces_dispatch_error() {
    let state = setup(Arc::new(NoopBridge)).await;

    let err = followers(Extension(state), None).await.unwrap_err();
    assert!(matches!(err, ApiError::Dispatch(_)));
}
