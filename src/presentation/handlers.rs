// HTTP request handlers
use crate::application::control_supervisor::SupervisorStatus;
use crate::application::telemetry_engine::MonitoringStatus;
use crate::domain::command::{Command, CommandLogEntry, CommandRejection, DispatchOutcome};
use crate::domain::control::ControlState;
use crate::domain::telemetry::{ExportTable, Sample};
use crate::presentation::app_state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LiveRequest {
    pub live: bool,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full telemetry window, oldest first
pub async fn monitoring_snapshot(State(state): State<Arc<AppState>>) -> Json<Vec<Sample>> {
    Json(state.monitoring_service.snapshot().await)
}

pub async fn monitoring_latest(State(state): State<Arc<AppState>>) -> Json<Sample> {
    Json(state.monitoring_service.latest().await)
}

/// Window as a flat, display-formatted table
pub async fn monitoring_export(State(state): State<Arc<AppState>>) -> Json<ExportTable> {
    let rows = state.monitoring_service.export_rows().await;
    Json(ExportTable::from_rows(&rows))
}

pub async fn monitoring_status(State(state): State<Arc<AppState>>) -> Json<MonitoringStatus> {
    Json(state.monitoring_service.status().await)
}

/// Pause or resume the telemetry feed
pub async fn set_live(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LiveRequest>,
) -> Json<MonitoringStatus> {
    Json(state.monitoring_service.set_live(request.live).await)
}

pub async fn toggle_live(State(state): State<Arc<AppState>>) -> Json<MonitoringStatus> {
    state.monitoring_service.toggle_live().await;
    Json(state.monitoring_service.status().await)
}

pub async fn control_state(State(state): State<Arc<AppState>>) -> Json<ControlState> {
    Json(state.control_service.get_state().await)
}

pub async fn control_status(State(state): State<Arc<AppState>>) -> Json<SupervisorStatus> {
    Json(state.control_service.status().await)
}

/// Dispatch one command to the supervisor.
///
/// Interlock rejections answer 409, unknown modes or presets 422.
pub async fn dispatch_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<Command>,
) -> (StatusCode, Json<DispatchOutcome>) {
    let outcome = state.control_service.dispatch(command).await;
    let status = outcome
        .rejection
        .as_ref()
        .map_or(StatusCode::OK, rejection_status);
    (status, Json(outcome))
}

fn rejection_status(rejection: &CommandRejection) -> StatusCode {
    match rejection {
        CommandRejection::EmergencyStopActive => StatusCode::CONFLICT,
        CommandRejection::UnknownMode { .. } | CommandRejection::UnknownPreset(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

/// Accepted commands, newest first
pub async fn command_history(State(state): State<Arc<AppState>>) -> Json<Vec<CommandLogEntry>> {
    Json(state.control_service.history().await)
}
