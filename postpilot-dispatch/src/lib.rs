//! Dispatch bridge: the seam between the API and the out-of-process workers
//! that actually perform social-media automation and AI inference.
//!
//! The bridge is a polymorphic capability with two production variants:
//!
//! - [`PythonBridge`] - runs the automation scripts as local subprocesses
//! - [`HttpBridge`] - hands jobs to a remote worker service over HTTP and
//!   polls it for live job status
//!
//! Every external call is attempted once, bounded by a fixed timeout, and
//! its failure is reported upward; there are no retries at this layer.

mod bridge;
mod deepseek;
mod error;
mod http;
mod python;
mod types;

pub use bridge::{DispatchBridge, NoopBridge};
pub use deepseek::DeepSeekClient;
pub use error::DispatchError;
pub use http::HttpBridge;
pub use python::PythonBridge;
pub use types::JobHandoff;

// Re-export async_trait for convenience when implementing DispatchBridge
pub use async_trait::async_trait;
