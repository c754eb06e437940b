//! Remote-worker bridge: hands jobs to a worker service over HTTP and polls
//! it for live status.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use postpilot_db::JobStatus;
use serde::Deserialize;

use crate::bridge::DispatchBridge;
use crate::error::DispatchError;
use crate::types::JobHandoff;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct HttpBridge {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

impl HttpBridge {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DispatchError> {
        Self::with_timeout_secs(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout_secs(
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl DispatchBridge for HttpBridge {
    async fn dispatch(&self, handoff: &JobHandoff) -> Result<String, DispatchError> {
        let url = format!("{}/jobs", self.base_url);
        let resp = self.client.post(&url).json(handoff).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DispatchError::InvalidResponse(format!(
                "worker returned {status}: {body}"
            )));
        }

        Ok(resp.text().await?)
    }

    async fn poll_status(&self, job_id: &str) -> Result<JobStatus, DispatchError> {
        let url = format!("{}/status/{}", self.base_url, job_id);
        let resp = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                DispatchError::Timeout(self.timeout_secs)
            } else {
                DispatchError::Http(e)
            }
        })?;

        if !resp.status().is_success() {
            return Err(DispatchError::InvalidResponse(format!(
                "status endpoint returned {}",
                resp.status()
            )));
        }

        let body: StatusResponse = resp.json().await?;
        JobStatus::from_str(&body.status).map_err(DispatchError::InvalidResponse)
    }
}
