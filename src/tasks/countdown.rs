//! Frame-driven countdown task

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, TimerSnapshot};

/// Subscribe to phase transitions and spawn the countdown task.
///
/// Subscribing happens before the spawn so a transition sent right after this
/// call is never missed.
pub fn spawn_countdown_task(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let transitions = state.subscribe_transitions();
    let frames = state.subscribe_frames();
    tokio::spawn(countdown_task(state, transitions, frames))
}

/// Background task that advances the countdown while the timer is running.
///
/// This task is the only writer of the remaining time, so at most one advance
/// loop can ever be active. It waits for a running transition, then executes
/// one run until pause, reset, or completion, and goes back to waiting.
pub async fn countdown_task(
    state: Arc<AppState>,
    mut transitions: broadcast::Receiver<TimerSnapshot>,
    mut frames: watch::Receiver<u64>,
) {
    info!("Starting countdown task");

    loop {
        match transitions.recv().await {
            Ok(snapshot) => {
                if !snapshot.is_running() {
                    debug!("Countdown task observed a paused transition while idle");
                    continue;
                }
                run_countdown(&state, &mut transitions, &mut frames).await;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Countdown task lagged behind {} transitions", skipped);
                if timer_is_running(&state) {
                    run_countdown(&state, &mut transitions, &mut frames).await;
                }
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    info!("Countdown task stopped");
}

/// One running stretch: from a start or resume until pause, reset, or zero.
///
/// The remaining time is recomputed on every frame from the anchor timestamp
/// captured at the start of the run, never accumulated frame-to-frame, so a
/// stretch of skipped frames still lands on the correct value.
async fn run_countdown(
    state: &Arc<AppState>,
    transitions: &mut broadcast::Receiver<TimerSnapshot>,
    frames: &mut watch::Receiver<u64>,
) {
    let initial_value = match state.session_initial() {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to read countdown start value: {}", e);
            return;
        }
    };

    // A session with nothing on the clock completes immediately
    if initial_value == 0 {
        state.finish_session();
        return;
    }

    // Frames published before this run belong to a previous anchor
    frames.borrow_and_update();

    // Anchor timestamp: the first frame of this run
    let anchor = loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    return;
                }
                break *frames.borrow_and_update();
            }
            transition = transitions.recv() => {
                if !keep_running(state, transition) {
                    return;
                }
            }
        }
    };
    debug!("Countdown anchored at {}ms with {}s", anchor, initial_value);

    // Loop entry resets the remaining time to the initial value, which is
    // what lets a fully elapsed session restart
    if !state.store_remaining(initial_value) {
        return;
    }

    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    return;
                }
                let now = *frames.borrow_and_update();
                let elapsed_seconds = now.saturating_sub(anchor) / 1000;
                let remaining = initial_value.saturating_sub(elapsed_seconds);

                if remaining == 0 {
                    state.finish_session();
                    return;
                }
                if !state.store_remaining(remaining) {
                    // Paused or reset between frames
                    return;
                }
            }
            transition = transitions.recv() => {
                if !keep_running(state, transition) {
                    return;
                }
            }
        }
    }
}

/// Whether a run should keep going after a transition notification
fn keep_running(
    state: &AppState,
    transition: Result<TimerSnapshot, broadcast::error::RecvError>,
) -> bool {
    match transition {
        Ok(snapshot) => snapshot.is_running(),
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            warn!("Countdown run lagged behind {} transitions", skipped);
            timer_is_running(state)
        }
        Err(broadcast::error::RecvError::Closed) => false,
    }
}

fn timer_is_running(state: &AppState) -> bool {
    state
        .snapshot()
        .map(|snapshot| snapshot.is_running())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimerPhase;
    use std::time::Duration;
    use tokio::time::timeout;

    fn test_state(minutes: u32, seconds: u32) -> Arc<AppState> {
        Arc::new(AppState::new(9190, "127.0.0.1".to_string(), 60, minutes, seconds))
    }

    /// Publish a frame and wait for the countdown task to react with a
    /// snapshot update. Re-publishes if the frame raced the start of a run
    /// and was discarded as stale.
    async fn frame(
        state: &Arc<AppState>,
        snapshots: &mut watch::Receiver<TimerSnapshot>,
        timestamp: u64,
    ) -> TimerSnapshot {
        for _ in 0..10 {
            state.publish_frame(timestamp);
            if let Ok(Ok(())) = timeout(Duration::from_millis(100), snapshots.changed()).await {
                return snapshots.borrow_and_update().clone();
            }
        }
        panic!("countdown task did not react to frame at {}ms", timestamp);
    }

    fn drain(snapshots: &mut watch::Receiver<TimerSnapshot>) {
        snapshots.borrow_and_update();
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_recomputes_from_fixed_anchor() {
        let state = test_state(0, 10);
        spawn_countdown_task(Arc::clone(&state));
        let mut snapshots = state.subscribe_snapshots();

        state.toggle().unwrap();
        drain(&mut snapshots);

        let t0 = 5_000;
        assert_eq!(frame(&state, &mut snapshots, t0).await.remaining_seconds, 10);
        assert_eq!(frame(&state, &mut snapshots, t0 + 100).await.remaining_seconds, 10);
        assert_eq!(frame(&state, &mut snapshots, t0 + 999).await.remaining_seconds, 10);
        assert_eq!(frame(&state, &mut snapshots, t0 + 1001).await.remaining_seconds, 9);
        // A stretch of skipped frames still lands on the exact value
        assert_eq!(frame(&state, &mut snapshots, t0 + 4_500).await.remaining_seconds, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_resume_continue_from_latest_value() {
        let state = test_state(1, 0);
        spawn_countdown_task(Arc::clone(&state));
        let mut snapshots = state.subscribe_snapshots();

        state.toggle().unwrap();
        drain(&mut snapshots);
        assert_eq!(frame(&state, &mut snapshots, 1_000).await.remaining_seconds, 60);
        assert_eq!(frame(&state, &mut snapshots, 11_000).await.remaining_seconds, 50);

        let paused = state.toggle().unwrap();
        assert_eq!(paused.phase, TimerPhase::Paused);
        assert_eq!(paused.remaining_seconds, 50);
        drain(&mut snapshots);

        // Resume anchors a fresh timestamp; the pause gap does not count
        state.toggle().unwrap();
        drain(&mut snapshots);
        assert_eq!(frame(&state, &mut snapshots, 100_000).await.remaining_seconds, 50);
        assert_eq!(frame(&state, &mut snapshots, 105_000).await.remaining_seconds, 45);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_ignores_config_edits_made_while_paused() {
        let state = test_state(0, 30);
        spawn_countdown_task(Arc::clone(&state));
        let mut snapshots = state.subscribe_snapshots();

        state.toggle().unwrap();
        drain(&mut snapshots);
        assert_eq!(frame(&state, &mut snapshots, 2_000).await.remaining_seconds, 30);
        assert_eq!(frame(&state, &mut snapshots, 12_000).await.remaining_seconds, 20);

        state.toggle().unwrap();
        state.adjust_config("minutes-up", 1, 0).unwrap();
        drain(&mut snapshots);

        state.toggle().unwrap();
        drain(&mut snapshots);
        assert_eq!(frame(&state, &mut snapshots, 50_000).await.remaining_seconds, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_session_restarts_fresh() {
        let state = test_state(0, 5);
        spawn_countdown_task(Arc::clone(&state));
        let mut snapshots = state.subscribe_snapshots();

        state.toggle().unwrap();
        drain(&mut snapshots);
        assert_eq!(frame(&state, &mut snapshots, 1_000).await.remaining_seconds, 5);

        let done = frame(&state, &mut snapshots, 6_000).await;
        assert_eq!(done.phase, TimerPhase::Paused);
        assert_eq!(done.remaining_seconds, 0);
        assert_eq!(done.toggle_count, 0);
        // Display falls back to the configured duration
        assert_eq!(done.display_minutes(), 0);
        assert_eq!(done.display_seconds(), 5);

        // The next toggle behaves as a first start from the current config
        state.toggle().unwrap();
        drain(&mut snapshots);
        let restarted = frame(&state, &mut snapshots, 20_000).await;
        assert_eq!(restarted.phase, TimerPhase::Running);
        assert_eq!(restarted.remaining_seconds, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_a_running_countdown() {
        let state = test_state(0, 30);
        spawn_countdown_task(Arc::clone(&state));
        let mut snapshots = state.subscribe_snapshots();

        state.toggle().unwrap();
        drain(&mut snapshots);
        assert_eq!(frame(&state, &mut snapshots, 1_000).await.remaining_seconds, 30);

        let cleared = state.reset().unwrap();
        assert_eq!(cleared.phase, TimerPhase::Paused);
        assert_eq!(cleared.remaining_seconds, 0);
        assert_eq!(cleared.toggle_count, 0);
        drain(&mut snapshots);

        // A frame arriving after the reset must not resurrect the old run
        state.publish_frame(10_000);
        assert!(timeout(Duration::from_millis(100), snapshots.changed())
            .await
            .is_err());
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_time_never_increases_while_running() {
        let state = test_state(0, 10);
        spawn_countdown_task(Arc::clone(&state));
        let mut snapshots = state.subscribe_snapshots();

        state.toggle().unwrap();
        drain(&mut snapshots);

        let mut last = frame(&state, &mut snapshots, 0).await.remaining_seconds;
        for timestamp in [400, 1_200, 1_300, 2_600, 7_000, 9_100] {
            let remaining = frame(&state, &mut snapshots, timestamp).await.remaining_seconds;
            assert!(remaining <= last);
            last = remaining;
        }
    }
}
