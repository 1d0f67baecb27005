// Application state for HTTP handlers
use crate::application::control_service::ControlService;
use crate::application::monitoring_service::MonitoringService;

#[derive(Clone)]
pub struct AppState {
    pub monitoring_service: MonitoringService,
    pub control_service: ControlService,
}
