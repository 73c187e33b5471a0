//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{ApiResponse, HealthResponse, StatusResponse};
use crate::state::{AppState, TimerPhase, SECONDS_STEP};

/// Handle POST /toggle - Flip between running and paused
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle() {
        Ok(snapshot) => {
            info!("Toggle endpoint called - timer now {:?}", snapshot.phase);
            let message = match snapshot.phase {
                TimerPhase::Running => "Countdown running".to_string(),
                TimerPhase::Paused => "Countdown paused".to_string(),
            };
            Ok(Json(ApiResponse::for_timer(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to toggle timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Clear the session and the configured duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(snapshot) => {
            info!("Reset endpoint called - timer cleared");
            Ok(Json(ApiResponse::for_timer(
                "Timer cleared".to_string(),
                snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /adjust/:field/:direction - Step the configured duration
///
/// Minutes step by 1 and seconds step by 5, matching the four arrow controls
/// of the clock face.
pub async fn adjust_handler(
    State(state): State<Arc<AppState>>,
    Path((field, direction)): Path<(String, String)>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let (delta_minutes, delta_seconds) = match (field.as_str(), direction.as_str()) {
        ("minutes", "up") => (1, 0),
        ("minutes", "down") => (-1, 0),
        ("seconds", "up") => (0, SECONDS_STEP),
        ("seconds", "down") => (0, -SECONDS_STEP),
        _ => {
            warn!("Unknown adjustment control: {}/{}", field, direction);
            return Err(StatusCode::NOT_FOUND);
        }
    };

    let action = format!("{}-{}", field, direction);
    match state.adjust_config(&action, delta_minutes, delta_seconds) {
        Ok(snapshot) => {
            let message = format!(
                "Configured duration set to {}m {}s",
                snapshot.config.minutes, snapshot.config.seconds
            );
            Ok(Json(ApiResponse::for_timer(message, snapshot)))
        }
        Err(e) => {
            error!("Failed to adjust configuration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the snapshot and derived display values
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        phase: snapshot.phase,
        configured_minutes: snapshot.config.minutes,
        configured_seconds: snapshot.config.seconds,
        remaining_seconds: snapshot.remaining_seconds,
        total_duration_seconds: snapshot.total_duration_seconds,
        toggle_count: snapshot.toggle_count,
        display_minutes: snapshot.display_minutes(),
        display_seconds: snapshot.display_seconds(),
        ring_progress: snapshot.ring_progress(),
        full_rings: snapshot.full_rings(),
        frame_rate: state.frame_rate,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(9190, "127.0.0.1".to_string(), 60, 2, 5))
    }

    #[tokio::test]
    async fn status_reports_ring_display_values() {
        let state = test_state();
        let response = status_handler(State(state)).await.unwrap();

        assert_eq!(response.0.phase, TimerPhase::Paused);
        assert_eq!(response.0.configured_minutes, 2);
        assert_eq!(response.0.configured_seconds, 5);
        // Nothing on the clock yet, display falls back to the configuration
        assert_eq!(response.0.display_minutes, 2);
        assert_eq!(response.0.display_seconds, 5);
        assert_eq!(response.0.full_rings, 2);
        assert!((response.0.ring_progress - 5.0 / 60.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn adjust_rejects_unknown_controls() {
        let state = test_state();
        let result = adjust_handler(
            State(state),
            Path(("hours".to_string(), "up".to_string())),
        )
        .await;

        assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn adjust_steps_minutes_and_seconds() {
        let state = test_state();

        let response = adjust_handler(
            State(Arc::clone(&state)),
            Path(("minutes".to_string(), "up".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(response.0.timer.config.minutes, 3);

        let response = adjust_handler(
            State(Arc::clone(&state)),
            Path(("seconds".to_string(), "down".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(response.0.timer.config.seconds, 0);
    }

    #[tokio::test]
    async fn toggle_and_reset_round_trip() {
        let state = test_state();

        let response = toggle_handler(State(Arc::clone(&state))).await.unwrap();
        assert_eq!(response.0.status, "running");

        let response = reset_handler(State(Arc::clone(&state))).await.unwrap();
        assert_eq!(response.0.status, "paused");
        assert_eq!(response.0.timer.remaining_seconds, 0);
        assert_eq!(response.0.timer.config.minutes, 0);
        assert_eq!(response.0.timer.config.seconds, 0);
    }
}
