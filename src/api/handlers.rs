//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    services::format_training_time,
    state::AppState,
    timer::{ScheduledEvent, TimerEngine, WorkoutSchedule},
};
use super::responses::{
    AddTimeRequest, ApiResponse, ErrorResponse, HealthResponse, HistoryResponse, MuteRequest,
    StartRequest, StatusResponse,
};

type HandlerResult = Result<Json<ApiResponse>, StatusCode>;

/// Run `apply` against the engine and wrap the resulting snapshot.
fn run_command<F>(state: &AppState, action: &str, message: &str, apply: F) -> HandlerResult
where
    F: FnOnce(&mut TimerEngine),
{
    match state.command(action, apply) {
        Ok(snapshot) => {
            info!("{} endpoint called", action);
            Ok(Json(ApiResponse::new(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to apply {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start a workout from a preset or explicit schedule
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ErrorResponse>)> {
    let schedule = match (request.schedule, request.preset) {
        (Some(schedule), _) => schedule,
        (None, Some(name)) => WorkoutSchedule::from_preset_name(&name).map_err(|e| {
            warn!("Rejected start request: {}", e);
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
        })?,
        (None, None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("either 'preset' or 'schedule' is required".to_string())),
            ));
        }
    };

    let message = format!("Workout '{}' started", schedule.name());
    run_command(&state, "start", &message, |engine| engine.start(schedule))
        .map_err(|status| (status, Json(ErrorResponse::new("Failed to start workout".to_string()))))
}

/// Handle POST /pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "pause", "Timer paused", TimerEngine::pause)
}

/// Handle POST /resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "resume", "Timer resumed", TimerEngine::resume)
}

/// Handle POST /toggle - Pause if running, resume otherwise
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "toggle", "Timer toggled", TimerEngine::toggle_pause_resume)
}

/// Handle POST /stop - Stop and reset to idle
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "stop", "Timer stopped", TimerEngine::stop)
}

/// Handle POST /restart-phase
pub async fn restart_phase_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "restart-phase", "Current phase restarted", TimerEngine::restart_current_phase)
}

/// Handle POST /skip
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "skip", "Phase skipped", TimerEngine::skip_phase)
}

/// Handle POST /add-time - Add (or subtract) seconds from the current phase
pub async fn add_time_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddTimeRequest>,
) -> HandlerResult {
    let message = format!("Adjusted current phase by {}s", request.seconds);
    run_command(&state, "add-time", &message, |engine| engine.add_time(request.seconds))
}

/// Handle POST /mute
pub async fn mute_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MuteRequest>,
) -> HandlerResult {
    let message = if request.muted { "Cues muted" } else { "Cues unmuted" };
    run_command(&state, "mute", message, |engine| engine.set_muted(request.muted))
}

/// Handle POST /background - Host is about to suspend the timer
pub async fn background_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "background", "Background notifications scheduled", TimerEngine::enter_background)
}

/// Handle POST /foreground - Host is executing the timer again
pub async fn foreground_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "foreground", "Timer resynchronised", TimerEngine::enter_foreground)
}

/// Handle POST /resync - Reconcile with the wall clock on demand
pub async fn resync_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    run_command(&state, "resync", "Timer resynchronised", TimerEngine::resync)
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let settings = match state.settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get cue settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /presets - List built-in presets
pub async fn presets_handler() -> Json<Vec<WorkoutSchedule>> {
    Json(WorkoutSchedule::presets())
}

/// Handle GET /notifications - Pending background boundary notifications
pub async fn notifications_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ScheduledEvent>>, StatusCode> {
    state.outbox.pending().map(Json).map_err(|e| {
        error!("Failed to read notification outbox: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /history - Workout records and totals
pub async fn history_handler(State(state): State<Arc<AppState>>) -> Result<Json<HistoryResponse>, StatusCode> {
    let records = state.history.records();
    let stats = state.history.stats(state.clock.now());

    match (records, stats) {
        (Ok(records), Ok(stats)) => Ok(Json(HistoryResponse {
            formatted_total_time: format_training_time(stats.total_training_seconds),
            records,
            stats,
        })),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to read workout history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /history
pub async fn clear_history_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.history.clear() {
        Ok(()) => {
            info!("Workout history cleared");
            StatusCode::NO_CONTENT
        }
        Err(e) => {
            error!("Failed to clear workout history: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
