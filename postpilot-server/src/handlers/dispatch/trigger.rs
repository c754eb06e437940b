use std::sync::Arc;

use axum::{Extension, Json};
use postpilot_dispatch::JobHandoff;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{require_non_empty, to_payload};

#[derive(Debug, Deserialize)]
struct TriggerPayload {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    video_path: Option<String>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    headless: bool,
}

/// `POST /trigger` — run a TikTok upload directly through the dispatch
/// bridge, bypassing the job store. Output from the worker is relayed
/// verbatim.
pub async fn trigger(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.ok_or_else(|| ApiError::bad_request("missing request body"))?;
    let payload: TriggerPayload = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("invalid payload: {e}")))?;

    let mut issues = Vec::new();
    require_non_empty(&mut issues, "session_id", payload.session_id.as_deref());
    require_non_empty(&mut issues, "video_path", payload.video_path.as_deref());
    require_non_empty(&mut issues, "caption", payload.caption.as_deref());
    if !issues.is_empty() {
        return Err(ApiError::Validation(to_payload(&issues)));
    }

    let handoff = JobHandoff::new(
        "manual",
        "tiktok",
        payload.session_id.unwrap_or_default(),
        payload.video_path.unwrap_or_default(),
        payload.caption.unwrap_or_default(),
    )
    .headless(payload.headless);

    let output = state.bridge.dispatch(&handoff).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Upload completed",
        "output": output,
    })))
}
