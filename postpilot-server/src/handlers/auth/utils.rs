use std::sync::Arc;

use axum::http::HeaderMap;
use postpilot_auth::AuthContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Raw `Authorization` header value, if present and readable.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Verify the caller's bearer token. A missing, malformed or expired token
/// surfaces as a 401.
pub async fn require_authenticated(
    state: &Arc<AppState>,
    headers: &HeaderMap,
) -> Result<AuthContext, ApiError> {
    let token = bearer_token(headers);
    let ctx = state.authenticator.authenticate(token).await?;
    Ok(ctx)
}
