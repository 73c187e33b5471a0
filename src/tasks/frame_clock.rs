//! Frame clock background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::info;

use crate::state::AppState;

/// Background task that publishes frame timestamps at the configured rate.
///
/// Each tick publishes the elapsed milliseconds since the task started, so
/// timestamps are monotonically increasing. Missed ticks are skipped: frames
/// are a sampling signal, not a queue, and the countdown recomputes from its
/// anchor rather than counting frames.
pub async fn frame_clock_task(state: Arc<AppState>) {
    let frame_rate = state.frame_rate.max(1);
    let period = Duration::from_millis((1000 / u64::from(frame_rate)).max(1));
    info!("Starting frame clock at {}fps", frame_rate);

    let epoch = Instant::now();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let timestamp = epoch.elapsed().as_millis() as u64;
        state.publish_frame(timestamp);
    }
}
