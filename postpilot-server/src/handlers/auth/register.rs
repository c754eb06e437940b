use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::RegisterPayload;

/// `POST /api/register` — create an account. Public.
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = body.ok_or_else(|| ApiError::bad_request("missing request body"))?;
    let payload: RegisterPayload = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("invalid payload: {e}")))?;

    if payload.username.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::bad_request(
            "username, email and password are required",
        ));
    }

    if postpilot_db::users::username_or_email_exists(
        &state.db_pool,
        payload.username.trim(),
        payload.email.trim(),
    )
    .await?
    {
        return Err(ApiError::bad_request("username or email already in use"));
    }

    let hash = postpilot_auth::hash_password(&payload.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = postpilot_db::users::insert_user(
        &state.db_pool,
        payload.username.trim(),
        payload.email.trim(),
        &hash,
        &chrono::Utc::now().to_rfc3339(),
    )
    .await?;

    tracing::info!(user_id = user.id, "registered new user");
    Ok((StatusCode::CREATED, Json(serde_json::to_value(user).map_err(|e| ApiError::Internal(e.to_string()))?)))
}
