use std::sync::Arc;

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct FollowersPayload {
    #[serde(default = "default_headless")]
    headless: bool,
}

fn default_headless() -> bool {
    true
}

/// `POST /followers` — run the follower-collection routine and relay its
/// output.
pub async fn followers(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let payload: FollowersPayload = match body {
        Some(Json(v)) => serde_json::from_value(v)
            .map_err(|e| ApiError::bad_request(format!("invalid payload: {e}")))?,
        None => FollowersPayload {
            headless: default_headless(),
        },
    };

    let output = state.bridge.collect_followers(payload.headless).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Follower collection completed",
        "output": output,
    })))
}
