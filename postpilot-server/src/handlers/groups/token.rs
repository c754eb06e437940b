use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::auth::utils::require_authenticated;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SaveTokenPayload {
    user_id: i64,
    group_id: i64,
    #[serde(rename = "type")]
    item_type: String,
    token: String,
}

/// `POST /tiktok_session` — store or replace a platform credential on a
/// group. One statement, so concurrent writers race on whole payloads and
/// the last write wins.
pub async fn save_social_token(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_authenticated(&state, &headers).await?;

    let Json(body) = body.ok_or_else(|| ApiError::bad_request("missing request body"))?;
    let payload: SaveTokenPayload = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("invalid payload: {e}")))?;

    if payload.item_type.trim().is_empty() || payload.token.trim().is_empty() {
        return Err(ApiError::bad_request("type and token are required"));
    }

    let group = postpilot_db::groups::find_by_id(&state.db_pool, payload.group_id)
        .await?
        .ok_or_else(|| ApiError::not_found("group not found"))?;

    if group.user_id != payload.user_id {
        return Err(ApiError::forbidden("group belongs to another user"));
    }

    let data = json!({ "token": payload.token }).to_string();
    let affected = postpilot_db::group_items::upsert_item(
        &state.db_pool,
        group.id,
        payload.item_type.trim(),
        &data,
        &chrono::Utc::now().to_rfc3339(),
    )
    .await?;

    if affected == 0 {
        return Err(ApiError::Persistence("credential write had no effect".into()));
    }

    tracing::info!(group_id = group.id, item_type = %payload.item_type, "saved social token");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Token saved successfully",
            "type": payload.item_type.trim(),
        })),
    ))
}
