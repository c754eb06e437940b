use std::sync::Arc;

use axum::{Extension, Json};
use postpilot_auth::AuthError;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::LoginPayload;

/// `POST /api/login` — exchange credentials for a bearer token. Public.
///
/// Unknown email and wrong password both answer 401 without distinguishing
/// which one failed.
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.ok_or_else(|| ApiError::bad_request("missing request body"))?;
    let payload: LoginPayload = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("invalid payload: {e}")))?;

    let user = postpilot_db::users::find_by_email(&state.db_pool, payload.email.trim())
        .await?
        .ok_or(ApiError::Authentication(AuthError::AuthenticationFailed))?;

    postpilot_auth::verify_password(&payload.password, &user.password_hash)
        .map_err(|_| ApiError::Authentication(AuthError::AuthenticationFailed))?;

    let token =
        postpilot_auth::issue_token(&state.jwt_secret, user.id, state.token_ttl_hours)
            .map_err(ApiError::Authentication)?;

    tracing::debug!(user_id = user.id, "issued login token");
    Ok(Json(json!({ "token": token })))
}
