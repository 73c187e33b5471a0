//! User-adjustable countdown duration

use serde::{Deserialize, Serialize};

/// Step applied by the seconds up/down controls
pub const SECONDS_STEP: i64 = 5;

/// Upper bound for the configured minutes
pub const MAX_MINUTES: u64 = 99;

const MAX_TOTAL_SECONDS: u64 = MAX_MINUTES * 60 + 59;

/// Configured countdown duration in minutes and seconds
///
/// Seconds are kept normalized to [0, 59]: second adjustments carry into and
/// borrow from minutes, and the total duration is clamped to
/// [0, `MAX_MINUTES`m59s].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub minutes: u64,
    pub seconds: u64,
}

impl TimerConfig {
    /// Create a configuration, normalizing overflowing seconds into minutes
    pub fn new(minutes: u64, seconds: u64) -> Self {
        let total = minutes
            .saturating_mul(60)
            .saturating_add(seconds)
            .min(MAX_TOTAL_SECONDS);
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    /// Create a zeroed configuration
    pub fn zero() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
        }
    }

    /// Total configured duration in seconds
    pub fn total_seconds(&self) -> u64 {
        self.minutes * 60 + self.seconds
    }

    /// Apply minute/second deltas from the adjustment controls.
    ///
    /// The minute delta clamps against the minute range before seconds are
    /// applied, so stepping minutes below zero leaves seconds untouched.
    /// Second deltas carry into and borrow from minutes.
    pub fn adjust(&mut self, delta_minutes: i64, delta_seconds: i64) {
        let minutes = (self.minutes as i64)
            .saturating_add(delta_minutes)
            .clamp(0, MAX_MINUTES as i64);
        let total = minutes
            .saturating_mul(60)
            .saturating_add(self.seconds as i64)
            .saturating_add(delta_seconds)
            .clamp(0, MAX_TOTAL_SECONDS as i64);
        self.minutes = (total / 60) as u64;
        self.seconds = (total % 60) as u64;
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::zero()
    }
}
