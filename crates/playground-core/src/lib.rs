//! Core of the code playground: everything between the input boxes and the
//! remote execution service.
//!
//! - **Language catalog**: fetched once at startup, sorted by name, first entry selected
//! - **Execution workflow**: validate, submit, poll on a bounded schedule, decode output
//! - **Playground session**: the page state (code, input, output, selection) plus the
//!   busy guard that rejects a second run while one is in flight
//! - **Configuration**: service endpoint, credentials and poll schedule, loaded once

pub mod catalog;
pub mod config;
pub mod errors;
pub mod output;
pub mod poll;
pub mod session;
pub mod test_utils;
pub mod trace;
pub mod workflow;

pub use catalog::LanguageCatalog;
pub use config::*;
pub use errors::PlaygroundError;
pub use poll::PollPolicy;
pub use session::Playground;
pub use trace::{LogTraceHandler, RunPhase, RunTraceHandler};
pub use workflow::ExecutionWorkflow;

pub use playground_client::{ExecutionClient, LanguageDescriptor};
