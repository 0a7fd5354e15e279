//! Consolidated test mocks for the playground crates
//!
//! Two doubles for the remote execution service: an in-memory
//! [`MockExecutionClient`] for workflow tests that run on a paused clock, and a
//! [`MockJudgeServer`] speaking real HTTP for client-level tests.

pub mod client;
pub mod judge_server;

pub use client::*;
pub use judge_server::*;

use base64::Engine;

/// Encode text the way the service encodes output fields
pub fn encode(text: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(text)
}
