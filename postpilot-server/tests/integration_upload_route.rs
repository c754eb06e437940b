use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use postpilot_auth::TestAuthenticator;
use postpilot_db::{create_pool, DbConnectionConfig};
use postpilot_dispatch::NoopBridge;
use postpilot_server::app::build_router;
use postpilot_server::state::AppState;
use tower::ServiceExt;

const BOUNDARY: &str = "X-TEST-BOUNDARY";

async fn setup(uploads_dir: &str) -> Router {
    let cfg = DbConnectionConfig::new("sqlite::memory:").with_max_connections(1);
    let pool = create_pool(&cfg).await.expect("pool");
    postpilot_migrations::sqlite_migrator()
        .run(&pool)
        .await
        .expect("migrations");

    let state = Arc::new(AppState::new(
        pool,
        Arc::new(TestAuthenticator::user(42)),
        Arc::new(NoopBridge),
        None,
        uploads_dir,
        "test-secret",
        24,
    ));
    build_router(state)
}

fn multipart_body(user_id: &str, platform: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    let mut text_part = |name: &str, value: &str| {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    };
    text_part("user_id", user_id);
    if let Some(platform) = platform {
        text_part("platform", platform);
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: video/mp4\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>, with_auth: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if with_auth {
        builder = builder.header(header::AUTHORIZATION, "Bearer test-token");
    }
    builder.body(Body::from(body)).expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn upload_stores_file_and_registers_queryable_job() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = setup(dir.path().to_str().unwrap()).await;

    let body = multipart_body("42", Some("TikTok"), Some(("clip.mp4", b"0123456789")));
    let response = router
        .clone()
        .oneshot(upload_request(body, true))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["platform"], "tiktok");
    let job_id = body["job_id"].as_str().expect("job id").to_string();
    let file_path = body["file_path"].as_str().expect("file path");
    assert_eq!(std::fs::read(file_path).expect("stored file"), b"0123456789");

    // owner sees the pending job
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/jobs/42/{job_id}/status"))
                .header(header::AUTHORIZATION, "Bearer test-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "pending");

    // a different path user id is rejected before any job data leaks
    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/jobs/7/{job_id}/status"))
                .header(header::AUTHORIZATION, "Bearer test-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_without_token_is_unauthorized() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = setup(dir.path().to_str().unwrap()).await;

    let body = multipart_body("42", Some("tiktok"), Some(("clip.mp4", b"0123")));
    let response = router
        .oneshot(upload_request(body, false))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_with_missing_fields_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = setup(dir.path().to_str().unwrap()).await;

    // no platform
    let body = multipart_body("42", None, Some(("clip.mp4", b"0123")));
    let response = router
        .clone()
        .oneshot(upload_request(body, true))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // no file
    let body = multipart_body("42", Some("tiktok"), None);
    let response = router
        .clone()
        .oneshot(upload_request(body, true))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // unparseable user id
    let body = multipart_body("forty-two", Some("tiktok"), Some(("clip.mp4", b"0123")));
    let response = router
        .oneshot(upload_request(body, true))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_is_public() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = setup(dir.path().to_str().unwrap()).await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
