use std::time::Duration;

use crate::config::PollingConfig;

/// Schedule for status checks after a submission.
///
/// The delay comes before every attempt, including the first. With the default
/// multiplier of 1.0 every delay equals `interval`.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub backoff_multiplier: f64,
    pub max_interval: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(10, Duration::from_millis(2000))
    }
}

impl PollPolicy {
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            backoff_multiplier: 1.0,
            max_interval: None,
        }
    }

    pub fn with_backoff(mut self, multiplier: f64, max_interval: Option<Duration>) -> Self {
        self.backoff_multiplier = multiplier;
        self.max_interval = max_interval;
        self
    }

    /// Delay before the zero-based `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = if self.backoff_multiplier <= 1.0 {
            self.interval
        } else {
            let factor = self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
            Duration::try_from_secs_f64(self.interval.as_secs_f64() * factor)
                .unwrap_or(Duration::MAX)
        };

        match self.max_interval {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    /// Sum of all delays when every attempt comes back non-terminal
    pub fn worst_case_wait(&self) -> Duration {
        (0..self.max_attempts).fold(Duration::ZERO, |total, attempt| {
            total.saturating_add(self.delay_for(attempt))
        })
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        PollPolicy::fixed(config.max_attempts, Duration::from_millis(config.interval_ms))
            .with_backoff(
                config.backoff_multiplier,
                config.max_interval_ms.map(Duration::from_millis),
            )
    }
}
