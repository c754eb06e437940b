use std::sync::Arc;

use axum::extract::Multipart;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::registrar::StorageKind;
use crate::state::AppState;

use super::store_file::store_upload;
use crate::handlers::auth::utils::require_authenticated;

/// `POST /upload` — accept a media file plus `user_id` and `platform` form
/// fields, store the file, and register a pending job.
///
/// Either everything succeeds and the job is queryable, or the request fails
/// and no job record exists.
pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_authenticated(&state, &headers).await?;

    let mut user_id: Option<String> = None;
    let mut platform: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "user_id" => {
                user_id = Some(field.text().await.map_err(bad_field)?);
            }
            "platform" => {
                platform = Some(field.text().await.map_err(bad_field)?);
            }
            "file" => {
                let name = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = field.bytes().await.map_err(bad_field)?;
                file = Some((name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let user_id = user_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("user_id field is required"))?
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request("invalid user_id format"))?;

    let platform = platform
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("platform field is required"))?;

    let (filename, bytes) = file.ok_or_else(|| ApiError::bad_request("file field is required"))?;

    let path = store_upload(&state.uploads_dir, &filename, &bytes).await?;

    let job = state
        .registrar
        .register(&state.db_pool, user_id, &platform, &path, StorageKind::Local)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "File uploaded successfully",
            "file_path": job.file_path,
            "job_id": job.job_id,
            "platform": job.platform,
        })),
    ))
}

fn bad_field(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::bad_request(format!("unreadable multipart field: {e}"))
}
