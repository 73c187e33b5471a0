//! Background tasks module
//!
//! This module contains the frame clock and the countdown task that run
//! alongside the HTTP server.

pub mod countdown;
pub mod frame_clock;

// Re-export main functions
pub use countdown::{countdown_task, spawn_countdown_task};
pub use frame_clock::frame_clock_task;
