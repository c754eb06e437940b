//! Durable job records: the store that tracks every accepted upload job.
//!
//! The store performs no ownership checks of its own; writers are trusted
//! internal collaborators, and it is the status-query layer's job to
//! authorize readers.

use crate::DbBackend;
use serde::{Deserialize, Serialize};
use sqlx::Executor;
use std::str::FromStr;

/// Lifecycle state of an upload job.
///
/// Transitions are monotonic: `Pending -> Running -> Success | Failed`.
/// There is no path back to `Pending`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl JobStatus {
    /// Returns true if this status represents a terminal state.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// Position of the status along the lifecycle, used to pick the more
    /// advanced of two independently observed states.
    #[inline]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Running => 1,
            Self::Success | Self::Failed => 2,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UploadJobsRow {
    pub id: String,
    pub user_id: i64,
    pub platform: String,
    pub video_path: Option<String>,
    pub file_url: Option<String>,
    pub storage_type: String,
    pub status: String,
    pub created_at: String,
}

impl UploadJobsRow {
    /// Parse the stored status column. A value outside the known set signals
    /// data corruption and is surfaced to the caller rather than masked.
    pub fn job_status(&self) -> Result<JobStatus, String> {
        JobStatus::from_str(&self.status)
    }
}

pub async fn insert_upload_job<'e, E>(executor: E, row: &UploadJobsRow) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query(
        r#"
        INSERT INTO upload_jobs (id, user_id, platform, video_path, file_url, storage_type, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&row.id)
    .bind(row.user_id)
    .bind(&row.platform)
    .bind(&row.video_path)
    .bind(&row.file_url)
    .bind(&row.storage_type)
    .bind(&row.status)
    .bind(&row.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<UploadJobsRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, UploadJobsRow>(
        "SELECT id, user_id, platform, video_path, file_url, storage_type, status, created_at FROM upload_jobs WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Update a job's status, returning the number of affected rows. Zero rows
/// means the id is unknown; the caller decides how to surface that.
pub async fn update_status<'e, E>(
    executor: E,
    id: &str,
    status: JobStatus,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let result = sqlx::query("UPDATE upload_jobs SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
