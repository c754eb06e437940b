//! The dispatch bridge trait.

use async_trait::async_trait;
use postpilot_db::JobStatus;

use crate::error::DispatchError;
use crate::types::JobHandoff;

/// Seam between the job coordinator and whatever executes the external work.
///
/// Implementations must be cheap to share behind an `Arc` and must bound
/// every external call with a timeout; a hung worker must not wedge the
/// caller.
#[async_trait]
pub trait DispatchBridge: Send + Sync {
    /// Fire the external work for one job, returning its textual output.
    async fn dispatch(&self, handoff: &JobHandoff) -> Result<String, DispatchError>;

    /// Live status lookup for a previously dispatched job.
    ///
    /// Bridges that cannot observe running work return
    /// [`DispatchError::Unsupported`]; callers then fall back to the last
    /// stored status.
    async fn poll_status(&self, job_id: &str) -> Result<JobStatus, DispatchError>;

    /// Run the follower-collection routine and return its output.
    async fn collect_followers(&self, _headless: bool) -> Result<String, DispatchError> {
        Err(DispatchError::Unsupported("follower collection"))
    }
}

/// A bridge that accepts every job and does nothing.
///
/// Useful as a placeholder when no worker is configured, and in tests.
#[derive(Debug, Default, Clone)]
pub struct NoopBridge;

#[async_trait]
impl DispatchBridge for NoopBridge {
    async fn dispatch(&self, handoff: &JobHandoff) -> Result<String, DispatchError> {
        tracing::debug!(job_id = %handoff.job_id, "noop bridge swallowed dispatch");
        Ok(String::new())
    }

    async fn poll_status(&self, _job_id: &str) -> Result<JobStatus, DispatchError> {
        Err(DispatchError::Unsupported("status polling"))
    }
}
