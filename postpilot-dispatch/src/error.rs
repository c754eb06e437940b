//! Error types for the dispatch bridge.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that may occur while handing work to an external collaborator.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0} is not supported by this bridge")]
    Unsupported(&'static str),

    #[error("script does not exist at path: {}", .0.display())]
    ScriptMissing(PathBuf),

    #[error("input file does not exist at path: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("neither 'python' nor 'python3' found in PATH")]
    InterpreterNotFound,

    #[error("external process failed: {stderr}")]
    ScriptFailed { stderr: String },

    #[error("external call exceeded {0}s timeout")]
    Timeout(u64),

    #[error("worker returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
