use std::sync::Arc;

use axum::extract::Path;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use postpilot_db::upload_jobs;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::auth::utils::require_authenticated;
use crate::state::AppState;

/// `GET /jobs/{user_id}/{job_id}/status` — report a job's lifecycle state.
///
/// Ownership is enforced before any job data is returned. For live jobs the
/// dispatch bridge is consulted and a more advanced observation is written
/// back; stored state never moves backwards. When the bridge cannot answer,
/// the last stored status is served and flagged as possibly stale.
pub async fn get_status(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path((user_id, job_id)): Path<(i64, String)>,
) -> Result<Json<Value>, ApiError> {
    require_authenticated(&state, &headers).await?;

    let row = upload_jobs::find_by_id(&state.db_pool, &job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("job not found"))?;

    if row.user_id != user_id {
        return Err(ApiError::forbidden("job belongs to another user"));
    }

    let stored = row.job_status().map_err(ApiError::Persistence)?;
    let mut status = stored;
    let mut stale = false;

    if !stored.is_terminal() {
        match state.bridge.poll_status(&job_id).await {
            Ok(live) => {
                if live.rank() > stored.rank() {
                    // Best effort: a lost write-back only costs one extra poll.
                    if let Err(e) = upload_jobs::update_status(&state.db_pool, &job_id, live).await
                    {
                        tracing::warn!(%job_id, error = %e, "status write-back failed");
                    }
                    status = live;
                }
            }
            Err(e) => {
                tracing::debug!(%job_id, error = %e, "live status unavailable, serving stored state");
                stale = true;
            }
        }
    }

    Ok(Json(json!({
        "job_id": row.id,
        "user_id": row.user_id,
        "platform": row.platform,
        "status": status.as_str(),
        "stale": stale,
    })))
}
