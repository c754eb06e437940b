use std::sync::Arc;

use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::handlers::auth::utils::require_authenticated;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateGroupPayload {
    user_id: i64,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

/// `POST /createGroup` — create a named collection of social accounts.
pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    require_authenticated(&state, &headers).await?;

    let Json(body) = body.ok_or_else(|| ApiError::bad_request("missing request body"))?;
    let payload: CreateGroupPayload = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("invalid payload: {e}")))?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("group name is required"));
    }

    // groups carry a foreign key on users; surface an unknown owner as a
    // client error instead of a constraint failure
    postpilot_db::users::find_by_id(&state.db_pool, payload.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    let group = postpilot_db::groups::insert_group(
        &state.db_pool,
        payload.user_id,
        payload.name.trim(),
        payload.description.as_deref(),
        &chrono::Utc::now().to_rfc3339(),
    )
    .await?;

    tracing::info!(group_id = group.id, user_id = group.user_id, "created group");
    Ok(Json(serde_json::to_value(group).map_err(|e| ApiError::Internal(e.to_string()))?))
}
