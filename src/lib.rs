//! Ring Clock - A state-managed countdown timer with a ring display model
//!
//! This library provides a frame-driven countdown timer: a single state
//! machine toggled between paused and running, advanced once per frame from
//! an anchored start timestamp, and observed through immutable snapshots
//! that carry the circular display values.

pub mod api;
pub mod config;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::{AppState, TimerConfig, TimerPhase, TimerSnapshot};
pub use tasks::{frame_clock_task, spawn_countdown_task};
pub use utils::signals::shutdown_signal;
