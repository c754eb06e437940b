//! Job registration: mints collision-free job ids and writes the durable
//! record that makes an accepted upload queryable.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use postpilot_db::upload_jobs::{self, UploadJobsRow};
use postpilot_db::{DbPool, JobStatus};
use serde::Serialize;

use crate::error::ApiError;

/// Where the job's media bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Local,
    Remote,
}

impl StorageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// Mints ids of the form `{user_id}-{pid}-{seq}`.
///
/// The process id alone is not unique across requests in one process
/// lifetime, so a per-process counter disambiguates; ids stay unique even
/// when one user submits many uploads concurrently.
#[derive(Debug)]
struct JobIdGenerator {
    pid: u32,
    counter: AtomicU64,
}

impl JobIdGenerator {
    fn new() -> Self {
        Self {
            pid: std::process::id(),
            counter: AtomicU64::new(0),
        }
    }

    fn next_id(&self, user_id: i64) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{user_id}-{}-{seq}", self.pid)
    }
}

/// Reference to a freshly registered job, echoed back to the uploader.
#[derive(Debug, Clone, Serialize)]
pub struct JobRef {
    pub job_id: String,
    pub platform: String,
    pub file_path: String,
}

#[derive(Debug, Clone)]
pub struct JobRegistrar {
    ids: Arc<JobIdGenerator>,
}

impl Default for JobRegistrar {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistrar {
    pub fn new() -> Self {
        Self {
            ids: Arc::new(JobIdGenerator::new()),
        }
    }

    /// Record an accepted upload as a pending job and return its reference.
    ///
    /// The media file is already on disk at this point; if the insert fails
    /// the file is left behind and flagged in the log for operator cleanup.
    pub async fn register(
        &self,
        pool: &DbPool,
        user_id: i64,
        platform: &str,
        video_path: &Path,
        storage: StorageKind,
    ) -> Result<JobRef, ApiError> {
        let job_id = self.ids.next_id(user_id);
        let path = video_path.display().to_string();
        let row = UploadJobsRow {
            id: job_id.clone(),
            user_id,
            platform: platform.to_string(),
            video_path: Some(path.clone()),
            file_url: None,
            storage_type: storage.as_str().to_string(),
            status: JobStatus::Pending.as_str().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        if let Err(e) = upload_jobs::insert_upload_job(pool, &row).await {
            tracing::warn!(%job_id, file = %path, error = %e, "job record write failed; stored file is orphaned");
            return Err(ApiError::Persistence(e.to_string()));
        }

        tracing::info!(%job_id, user_id, platform, "registered upload job");
        Ok(JobRef {
            job_id,
            platform: platform.to_string(),
            file_path: path,
        })
    }
}
