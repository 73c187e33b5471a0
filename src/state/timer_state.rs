//! Timer phase and observable snapshots

use serde::{Deserialize, Serialize};

use super::TimerConfig;

/// Countdown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Paused,
    Running,
}

/// Immutable view of the timer published to observers
///
/// Display values are derived on demand rather than stored: while the
/// countdown holds time they come from `remaining_seconds`, and once it is
/// exhausted they fall back to the configured duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub config: TimerConfig,
    pub remaining_seconds: u64,
    pub total_duration_seconds: u64,
    pub toggle_count: u32,
}

impl TimerSnapshot {
    /// Create a paused snapshot with no active session
    pub fn new(config: TimerConfig) -> Self {
        Self {
            phase: TimerPhase::Paused,
            config,
            remaining_seconds: 0,
            total_duration_seconds: 0,
            toggle_count: 0,
        }
    }

    /// Check if the timer is running
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Minutes shown on the clock face
    pub fn display_minutes(&self) -> u64 {
        if self.remaining_seconds > 0 {
            self.remaining_seconds / 60
        } else {
            self.config.minutes
        }
    }

    /// Seconds shown on the clock face
    pub fn display_seconds(&self) -> u64 {
        if self.remaining_seconds > 0 {
            self.remaining_seconds - self.display_minutes() * 60
        } else {
            self.config.seconds
        }
    }

    /// Fill fraction of the primary progress ring for the current minute
    pub fn ring_progress(&self) -> f32 {
        self.display_seconds() as f32 / 60.0
    }

    /// Number of full rings drawn behind the primary ring, one per whole
    /// minute shown
    pub fn full_rings(&self) -> u64 {
        self.display_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_splits_remaining_time() {
        let mut snapshot = TimerSnapshot::new(TimerConfig::zero());
        snapshot.remaining_seconds = 125;
        assert_eq!(snapshot.display_minutes(), 2);
        assert_eq!(snapshot.display_seconds(), 5);
        assert_eq!(snapshot.full_rings(), 2);
        assert!((snapshot.ring_progress() - 5.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn display_falls_back_to_config_at_zero() {
        let snapshot = TimerSnapshot::new(TimerConfig::new(3, 20));
        assert_eq!(snapshot.remaining_seconds, 0);
        assert_eq!(snapshot.display_minutes(), 3);
        assert_eq!(snapshot.display_seconds(), 20);
        assert_eq!(snapshot.full_rings(), 3);
        assert!((snapshot.ring_progress() - 20.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ring_progress_stays_below_one() {
        let snapshot = TimerSnapshot::new(TimerConfig::new(0, 59));
        assert!(snapshot.ring_progress() < 1.0);
    }
}
