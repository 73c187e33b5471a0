//! State management module
//!
//! This module contains the countdown state structures and the application
//! state that owns them.

pub mod app_state;
pub mod timer_config;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_config::{TimerConfig, SECONDS_STEP};
pub use timer_state::{TimerPhase, TimerSnapshot};
