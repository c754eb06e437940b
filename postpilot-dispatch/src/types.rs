//! Core types for the dispatch bridge.

use serde::{Deserialize, Serialize};

/// Everything an external worker needs to execute one upload job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHandoff {
    pub job_id: String,
    pub platform: String,
    pub session_id: String,
    pub video_path: String,
    pub caption: String,
    #[serde(default)]
    pub headless: bool,
}

impl JobHandoff {
    pub fn new(
        job_id: impl Into<String>,
        platform: impl Into<String>,
        session_id: impl Into<String>,
        video_path: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            platform: platform.into(),
            session_id: session_id.into(),
            video_path: video_path.into(),
            caption: caption.into(),
            headless: false,
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}
