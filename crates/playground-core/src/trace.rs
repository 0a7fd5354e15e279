//! Observers for the phases of a run

/// Lifecycle of a single run once it has left idle.
///
/// `Submitting -> Polling { 1 } -> ... -> Polling { n } -> terminal`.
/// Validation failures are rejected while idle and produce no phase at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPhase {
    Submitting,
    Polling { attempt: u32 },
    Succeeded,
    Failed(String),
    TimedOut,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunPhase::Succeeded | RunPhase::Failed(_) | RunPhase::TimedOut
        )
    }
}

/// Receives every phase the workflow enters, in order, on the task driving the run
pub trait RunTraceHandler: Send + Sync {
    fn on_phase(&self, phase: &RunPhase);
}

/// Default handler: writes each transition to the log
pub struct LogTraceHandler;

impl RunTraceHandler for LogTraceHandler {
    fn on_phase(&self, phase: &RunPhase) {
        match phase {
            RunPhase::Failed(message) => log::warn!("Run failed: {}", message),
            RunPhase::TimedOut => log::warn!("Run timed out waiting for a terminal status"),
            other => log::debug!("Run phase: {:?}", other),
        }
    }
}
