// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::clock::Clock;
use crate::application::control_service::ControlService;
use crate::application::control_supervisor::ControlSupervisor;
use crate::application::monitoring_service::MonitoringService;
use crate::application::telemetry_engine::TelemetryEngine;
use crate::application::ticker::spawn_ticker;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::system_clock::SystemClock;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    command_history, control_state, control_status, dispatch_command, health_check,
    monitoring_export, monitoring_latest, monitoring_snapshot, monitoring_status, set_live,
    toggle_live,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let settings = load_settings()?;
    let addr = settings.bind_addr()?;
    let engine_settings = settings.engine_settings()?;
    let tick_interval = settings.tick_interval()?;
    let history_capacity = settings.history_capacity()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Create services (application layer)
    let engine = TelemetryEngine::new(&engine_settings, clock.now());
    let monitoring_service = MonitoringService::new(engine, clock.clone());
    let control_service = ControlService::new(ControlSupervisor::new(history_capacity), clock);

    let ticker = spawn_ticker(monitoring_service.clone(), tick_interval);

    // Create application state
    let state = Arc::new(AppState {
        monitoring_service,
        control_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/monitoring/snapshot", get(monitoring_snapshot))
        .route("/monitoring/latest", get(monitoring_latest))
        .route("/monitoring/export", get(monitoring_export))
        .route("/monitoring/status", get(monitoring_status))
        .route("/monitoring/live", put(set_live))
        .route("/monitoring/toggle", post(toggle_live))
        .route("/control/state", get(control_state))
        .route("/control/status", get(control_status))
        .route("/control/commands", post(dispatch_command))
        .route("/control/history", get(command_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    tracing::info!(
        "Starting hydroponic-core on {} (window {}, tick every {:?})",
        addr,
        engine_settings.window_len,
        tick_interval
    );

    let result = axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await;
    ticker.abort();
    result?;

    Ok(())
}
