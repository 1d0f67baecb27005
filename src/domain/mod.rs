// Domain layer - Plain data and pure rules
pub mod assessment;
pub mod command;
pub mod control;
pub mod preset;
pub mod telemetry;
