//! Helpers for exercising the workflow in tests

use std::sync::Mutex;

use crate::trace::{RunPhase, RunTraceHandler};

/// Keeps every transition in memory
#[derive(Default)]
pub struct RecordingTraceHandler {
    phases: Mutex<Vec<RunPhase>>,
}

impl RecordingTraceHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phases(&self) -> Vec<RunPhase> {
        self.phases
            .lock()
            .map(|phases| phases.clone())
            .unwrap_or_default()
    }
}

impl RunTraceHandler for RecordingTraceHandler {
    fn on_phase(&self, phase: &RunPhase) {
        if let Ok(mut phases) = self.phases.lock() {
            phases.push(phase.clone());
        }
    }
}
