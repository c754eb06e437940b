//! HTTP service for the postpilot backend.
//!
//! Wires the authentication, persistence and dispatch crates into an axum
//! router: account management, upload-job intake and status queries, group
//! credential storage, and relays to the external automation and AI workers.

pub mod app;
pub mod error;
pub mod handlers;
pub mod registrar;
pub mod state;
pub mod tracing_setup;
pub mod validation;
