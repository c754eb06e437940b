use std::sync::Arc;

use axum::extract::Multipart;
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::uploads::store_file::store_upload;
use crate::state::AppState;

/// `POST /ai/deepseek` — relay a prompt (multipart `prompt` field, plus
/// optional file attachments) to the AI backend. Attached files are stored
/// alongside regular uploads; the first attachment's text is appended to the
/// prompt.
pub async fn chat(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let client = state
        .ai
        .as_ref()
        .ok_or_else(|| ApiError::Internal("AI relay is not configured".into()))?;

    let mut prompt: Option<String> = None;
    let mut attachment: Option<String> = None;
    let mut saved_files: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "prompt" => {
                prompt = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("unreadable prompt field: {e}"))
                })?);
            }
            "files" => {
                let name = field.file_name().unwrap_or("attachment.txt").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("unreadable file field: {e}"))
                })?;
                let path = store_upload(&state.uploads_dir, &name, &bytes).await?;
                if attachment.is_none() {
                    attachment = Some(String::from_utf8_lossy(&bytes).into_owned());
                }
                saved_files.push(path.display().to_string());
            }
            _ => {}
        }
    }

    let prompt = prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("prompt field is required"))?;

    let answer = client.chat(&prompt, attachment.as_deref()).await?;

    Ok(Json(json!({
        "response": answer,
        "saved_files": saved_files,
    })))
}
