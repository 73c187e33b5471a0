//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TimerPhase, TimerSnapshot};

/// API response structure for timer action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response whose status reflects the timer phase
    pub fn for_timer(message: String, timer: TimerSnapshot) -> Self {
        let status = match timer.phase {
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
        };
        Self::new(status.to_string(), message, timer)
    }
}

/// Status response with the snapshot and derived ring display values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub phase: TimerPhase,
    pub configured_minutes: u64,
    pub configured_seconds: u64,
    pub remaining_seconds: u64,
    pub total_duration_seconds: u64,
    pub toggle_count: u32,
    pub display_minutes: u64,
    pub display_seconds: u64,
    pub ring_progress: f32,
    pub full_rings: u64,
    pub frame_rate: u32,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
