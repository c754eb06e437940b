//! File intake: persist uploaded media bytes under the uploads directory.

use std::path::PathBuf;

use crate::error::ApiError;

/// Write one uploaded file to disk and return its path.
///
/// The client-supplied name is sanitized so it can never escape the uploads
/// directory; a name that sanitizes to nothing is rejected. Creating the
/// directory is idempotent, so concurrent first uploads both succeed.
pub async fn store_upload(
    uploads_dir: &str,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, ApiError> {
    let safe_name = sanitize_filename::sanitize(filename);
    if safe_name.is_empty() {
        return Err(ApiError::bad_request("invalid file name"));
    }

    let dir = PathBuf::from(uploads_dir);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to create uploads dir: {e}")))?;

    let path = dir.join(safe_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to store upload: {e}")))?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "stored upload");
    Ok(path)
}
