//! Main application state management

use std::{sync::Mutex, time::Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

use super::{TimerConfig, TimerPhase, TimerSnapshot};

/// Mutable countdown state, guarded by the [`AppState`] mutex
#[derive(Debug)]
struct TimerCore {
    config: TimerConfig,
    phase: TimerPhase,
    remaining_seconds: u64,
    total_duration_seconds: u64,
    /// Value the next countdown run starts from
    session_initial: u64,
    toggle_count: u32,
}

impl TimerCore {
    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            config: self.config,
            remaining_seconds: self.remaining_seconds,
            total_duration_seconds: self.total_duration_seconds,
            toggle_count: self.toggle_count,
        }
    }
}

/// Main application state that owns the countdown timer
#[derive(Debug)]
pub struct AppState {
    /// Countdown state; all mutation happens under this lock
    core: Mutex<TimerCore>,
    /// Frame clock rate in frames per second
    pub frame_rate: u32,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for phase transition notifications (drives the countdown task)
    transition_tx: broadcast::Sender<TimerSnapshot>,
    /// Channel for snapshot updates (observed by the view layer)
    snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<TimerSnapshot>,
    /// Channel carrying frame clock timestamps in milliseconds
    frame_tx: watch::Sender<u64>,
    _frame_rx: watch::Receiver<u64>,
}

impl AppState {
    /// Create a new AppState with the given bind metadata and initial duration
    pub fn new(port: u16, host: String, frame_rate: u32, minutes: u32, seconds: u32) -> Self {
        let config = TimerConfig::new(u64::from(minutes), u64::from(seconds));
        let (transition_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::new(config));
        let (frame_tx, frame_rx) = watch::channel(0);

        Self {
            core: Mutex::new(TimerCore {
                config,
                phase: TimerPhase::Paused,
                remaining_seconds: 0,
                total_duration_seconds: 0,
                session_initial: 0,
                toggle_count: 0,
            }),
            frame_rate,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            transition_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            frame_tx,
            _frame_rx: frame_rx,
        }
    }

    /// Apply a mutation to the countdown state and publish the new snapshot
    fn mutate<F>(&self, action: &str, transition: bool, updater: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerCore),
    {
        let mut core = self
            .core
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        updater(&mut *core);
        let snapshot = core.snapshot();
        drop(core); // Release the lock early

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to send snapshot update: {}", e);
        }
        if transition {
            // Notify the countdown task of the phase transition
            if let Err(e) = self.transition_tx.send(snapshot.clone()) {
                warn!("Failed to send transition notification: {}", e);
            }
        }

        Ok(snapshot)
    }

    /// Flip between paused and running; the sole phase transition entry point
    pub fn toggle(&self) -> Result<TimerSnapshot, String> {
        self.mutate("toggle", true, |core| match core.phase {
            TimerPhase::Running => {
                info!("Pausing countdown at {}s remaining", core.remaining_seconds);
                core.phase = TimerPhase::Paused;
            }
            TimerPhase::Paused => {
                if core.toggle_count == 0 {
                    // Fresh start: snapshot the configured duration for this session
                    core.total_duration_seconds = core.config.total_seconds();
                    core.session_initial = core.total_duration_seconds;
                    core.toggle_count += 1;
                    info!("Starting countdown for {}s", core.session_initial);
                } else {
                    core.session_initial = if core.remaining_seconds > 0 {
                        core.remaining_seconds
                    } else {
                        core.total_duration_seconds
                    };
                    info!("Resuming countdown from {}s", core.session_initial);
                }
                core.phase = TimerPhase::Running;
            }
        })
    }

    /// Clear the countdown session and the configured duration
    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        self.mutate("reset", true, |core| {
            info!("Resetting timer");
            core.phase = TimerPhase::Paused;
            core.remaining_seconds = 0;
            core.total_duration_seconds = 0;
            core.session_initial = 0;
            core.toggle_count = 0;
            core.config = TimerConfig::zero();
        })
    }

    /// Adjust the configured duration from the up/down controls
    pub fn adjust_config(
        &self,
        action: &str,
        delta_minutes: i64,
        delta_seconds: i64,
    ) -> Result<TimerSnapshot, String> {
        self.mutate(action, false, |core| {
            core.config.adjust(delta_minutes, delta_seconds);
            info!(
                "Configured duration set to {}m {}s",
                core.config.minutes, core.config.seconds
            );
        })
    }

    /// Get the current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.core
            .lock()
            .map(|core| core.snapshot())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Initial value for the countdown run that is about to start
    pub(crate) fn session_initial(&self) -> Result<u64, String> {
        self.core
            .lock()
            .map(|core| core.session_initial)
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Store a recomputed remaining value from the countdown task.
    ///
    /// Returns false without writing unless the timer is still running, so a
    /// cancelled run can never resurrect stale time.
    pub(crate) fn store_remaining(&self, remaining_seconds: u64) -> bool {
        let mut core = match self.core.lock() {
            Ok(core) => core,
            Err(e) => {
                error!("Failed to lock timer state: {}", e);
                return false;
            }
        };

        if core.phase != TimerPhase::Running {
            return false;
        }
        core.remaining_seconds = remaining_seconds;
        let snapshot = core.snapshot();
        drop(core);

        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send snapshot update: {}", e);
        }
        true
    }

    /// Finish the active run: the countdown reached zero.
    ///
    /// The session is destroyed, so the next toggle starts fresh from the
    /// current configuration.
    pub(crate) fn finish_session(&self) {
        let mut core = match self.core.lock() {
            Ok(core) => core,
            Err(e) => {
                error!("Failed to lock timer state: {}", e);
                return;
            }
        };

        if core.phase != TimerPhase::Running {
            return;
        }
        core.phase = TimerPhase::Paused;
        core.remaining_seconds = 0;
        core.total_duration_seconds = 0;
        core.session_initial = 0;
        core.toggle_count = 0;
        let snapshot = core.snapshot();
        drop(core);

        info!("Countdown finished");
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send snapshot update: {}", e);
        }
    }

    /// Subscribe to phase transition notifications
    pub fn subscribe_transitions(&self) -> broadcast::Receiver<TimerSnapshot> {
        self.transition_tx.subscribe()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to frame clock timestamps
    pub fn subscribe_frames(&self) -> watch::Receiver<u64> {
        self.frame_tx.subscribe()
    }

    /// Publish a frame clock timestamp in milliseconds
    pub fn publish_frame(&self, timestamp_millis: u64) {
        if let Err(e) = self.frame_tx.send(timestamp_millis) {
            warn!("Failed to send frame timestamp: {}", e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
