// Application layer - Owned-state components and the services sharing them
pub mod clock;
pub mod control_service;
pub mod control_supervisor;
pub mod monitoring_service;
pub mod telemetry_engine;
pub mod ticker;
