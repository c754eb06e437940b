//! Local-subprocess bridge: runs the automation scripts with a detected
//! Python interpreter.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use postpilot_db::JobStatus;
use tokio::process::Command;

use crate::bridge::DispatchBridge;
use crate::error::DispatchError;
use crate::types::JobHandoff;

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Executes automation scripts as local subprocesses.
///
/// Scripts live under a configured root, one per platform
/// (`socialmedia/tiktok.py`, `socialmedia/instagram.py`, ...), plus the
/// follower-collection script at the root.
#[derive(Debug, Clone)]
pub struct PythonBridge {
    script_root: PathBuf,
    python_bin: Option<String>,
    timeout_secs: u64,
}

impl PythonBridge {
    pub fn new(script_root: impl Into<PathBuf>) -> Self {
        Self {
            script_root: script_root.into(),
            python_bin: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Override interpreter autodetection.
    pub fn with_python_bin(mut self, bin: Option<String>) -> Self {
        self.python_bin = bin;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Resolve the interpreter: the configured override, else the first of
    /// `python` / `python3` found on PATH.
    fn interpreter(&self) -> Result<String, DispatchError> {
        if let Some(ref bin) = self.python_bin {
            return Ok(bin.clone());
        }
        for candidate in ["python", "python3"] {
            if find_in_path(candidate) {
                return Ok(candidate.to_string());
            }
        }
        Err(DispatchError::InterpreterNotFound)
    }

    fn platform_script(&self, platform: &str) -> Result<PathBuf, DispatchError> {
        let script = self
            .script_root
            .join("socialmedia")
            .join(format!("{platform}.py"));
        if !script.exists() {
            return Err(DispatchError::ScriptMissing(script));
        }
        Ok(script)
    }

    /// Build the argument vector for a platform upload script.
    fn upload_args(script: &Path, handoff: &JobHandoff, video_path: &Path) -> Vec<String> {
        let mut args = vec![
            script.display().to_string(),
            "--sessionid".to_string(),
            handoff.session_id.clone(),
            "--video".to_string(),
            video_path.display().to_string(),
            "--caption".to_string(),
            handoff.caption.clone(),
        ];
        if handoff.headless {
            args.push("--headless".to_string());
        }
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<String, DispatchError> {
        let python = self.interpreter()?;
        tracing::debug!(%python, script = %args[0], "running automation script");

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new(&python).args(&args).output(),
        )
        .await
        .map_err(|_| DispatchError::Timeout(self.timeout_secs))??;

        if !output.status.success() {
            return Err(DispatchError::ScriptFailed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl DispatchBridge for PythonBridge {
    async fn dispatch(&self, handoff: &JobHandoff) -> Result<String, DispatchError> {
        let video_path = Path::new(&handoff.video_path);
        let abs_video = video_path
            .canonicalize()
            .map_err(|_| DispatchError::InputMissing(video_path.to_path_buf()))?;

        let script = self.platform_script(&handoff.platform)?;
        let args = Self::upload_args(&script, handoff, &abs_video);
        self.run(args).await
    }

    async fn poll_status(&self, _job_id: &str) -> Result<JobStatus, DispatchError> {
        // A fire-and-forget subprocess has no queryable live state.
        Err(DispatchError::Unsupported("status polling"))
    }

    async fn collect_followers(&self, headless: bool) -> Result<String, DispatchError> {
        let script = self.script_root.join("getFollowers.py");
        if !script.exists() {
            return Err(DispatchError::ScriptMissing(script));
        }
        let mut args = vec![script.display().to_string()];
        if headless {
            args.push("--headless".to_string());
        }
        self.run(args).await
    }
}

/// LookPath equivalent: does an executable with this name exist on PATH?
fn find_in_path(name: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| dir.join(name).is_file())
}
