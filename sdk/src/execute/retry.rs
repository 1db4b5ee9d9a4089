//! Retry policy: attempt ceiling, exponential backoff with jitter, and the
//! per-attempt and cumulative time limits.

use std::time::Duration;

use backoff::ExponentialBackoff;

use crate::config;

/// Bounds on how hard the dispatcher tries before giving up.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts across all nodes, including the first.
    pub max_attempts: u32,
    /// Backoff before the second attempt. Doubles per attempt.
    pub min_backoff: Duration,
    /// Backoff never exceeds this (before jitter).
    pub max_backoff: Duration,
    /// Jitter as a fraction of the backoff, 0.0 to 1.0.
    pub jitter_factor: f64,
    /// Timeout for a single send.
    pub request_timeout: Duration,
    /// Ceiling on the whole execute call.
    pub deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: config::DEFAULT_MAX_ATTEMPTS,
            min_backoff: config::DEFAULT_MIN_BACKOFF,
            max_backoff: config::DEFAULT_MAX_BACKOFF,
            jitter_factor: config::DEFAULT_JITTER_FACTOR,
            request_timeout: config::DEFAULT_REQUEST_TIMEOUT,
            deadline: config::DEFAULT_EXECUTION_DEADLINE,
        }
    }
}

impl RetryPolicy {
    /// No sleeping between attempts. Handy for tests and offline tools.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            jitter_factor: 0.0,
            ..Self::default()
        }
    }

    /// A fresh delay schedule for one execute call: `min_backoff`, doubled
    /// after every failure up to `max_backoff`, each delay spread by
    /// `jitter_factor`.
    ///
    /// The schedule never runs out on its own; the dispatcher's attempt
    /// ceiling and deadline decide when to stop.
    pub fn backoff_schedule(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.min_backoff,
            initial_interval: self.min_backoff,
            randomization_factor: self.jitter_factor.clamp(0.0, 1.0),
            multiplier: 2.0,
            max_interval: self.max_backoff,
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        }
    }
}
