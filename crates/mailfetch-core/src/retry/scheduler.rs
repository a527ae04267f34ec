use std::time::Duration;

use crate::error::ConfigError;

/// Socket timeout for the first attempt of a fetch.
pub const BASE_DELAY: Duration = Duration::from_secs(15);
/// Upper bound the socket timeout escalates to.
pub const MAX_DELAY: Duration = Duration::from_secs(5 * 60);
/// Timed out attempts tolerated per fetch before giving up.
pub const MAX_TIMEOUT_ERRORS: u32 = 5;

/// Deterministic doubling backoff, clamped to `[base, max]`.
///
/// The delay is handed to the pool as the socket timeout of the next
/// connection, so each timed out attempt gives the server longer to answer.
/// No jitter: a given `(base, max)` always yields the same sequence.
/// One instance belongs to one fetch and is never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryScheduler {
    base: Duration,
    max: Duration,
    current: Duration,
    attempts: u32,
}

impl Default for RetryScheduler {
    fn default() -> Self {
        Self {
            base: BASE_DELAY,
            max: MAX_DELAY,
            current: BASE_DELAY,
            attempts: 0,
        }
    }
}

impl RetryScheduler {
    /// Build a scheduler. Fails if `base` is zero or `max < base`.
    pub fn new(base: Duration, max: Duration) -> Result<Self, ConfigError> {
        check_bounds(base, max)?;
        Ok(Self {
            base,
            max,
            current: base,
            attempts: 0,
        })
    }

    /// Delay to use for the next connection attempt.
    pub fn current_delay(&self) -> Duration {
        self.current
    }

    /// Double the current delay (capped at `max`), store and return it.
    pub fn next_delay(&mut self) -> Duration {
        self.current = self.current.saturating_mul(2).min(self.max);
        self.attempts = self.attempts.saturating_add(1);
        self.current
    }

    /// Number of times the delay has been advanced.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

pub(crate) fn check_bounds(base: Duration, max: Duration) -> Result<(), ConfigError> {
    if base.is_zero() {
        return Err(ConfigError::ZeroBaseDelay);
    }
    if max < base {
        return Err(ConfigError::MaxBelowBase { base, max });
    }
    Ok(())
}
