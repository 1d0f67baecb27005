// Supervisor commands, rejections and the bounded command log
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use thiserror::Error;

/// Update of a single actuator field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ActuatorField {
    Enabled(bool),
    Level(f64),
    /// Raw mode name; validated against the actuator's mode set on dispatch.
    Mode(String),
    ScheduleActive(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SystemField {
    AutoMode(bool),
}

/// A named, validated request to the control supervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "camelCase")]
pub enum Command {
    SetLightField(ActuatorField),
    SetPumpField(ActuatorField),
    SetSystemField(SystemField),
    EmergencyStop,
    Reset,
    ApplyPreset(String),
    ClearHistory,
    RefreshCamera,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetLightField(_) => "setLightField",
            Command::SetPumpField(_) => "setPumpField",
            Command::SetSystemField(_) => "setSystemField",
            Command::EmergencyStop => "emergencyStop",
            Command::Reset => "reset",
            Command::ApplyPreset(_) => "applyPreset",
            Command::ClearHistory => "clearHistory",
            Command::RefreshCamera => "refreshCamera",
        }
    }

    /// Whether the interlock blocks this command while an emergency stop is latched.
    pub fn blocked_by_emergency_stop(&self) -> bool {
        match self {
            Command::SetLightField(_)
            | Command::SetPumpField(_)
            | Command::SetSystemField(_)
            | Command::EmergencyStop
            | Command::ApplyPreset(_) => true,
            Command::Reset | Command::ClearHistory | Command::RefreshCamera => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandRejection {
    #[error("rejected: emergency stop active")]
    EmergencyStopActive,
    #[error("unknown {actuator} mode '{value}'")]
    UnknownMode {
        actuator: &'static str,
        value: String,
    },
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

impl CommandRejection {
    pub fn reason_code(&self) -> &'static str {
        match self {
            CommandRejection::EmergencyStopActive => "emergency_stop_active",
            CommandRejection::UnknownMode { .. } => "unknown_mode",
            CommandRejection::UnknownPreset(_) => "unknown_preset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandLogEntry {
    pub timestamp: DateTime<Utc>,
    pub command_name: &'static str,
    pub summary: String,
}

/// Append-only audit trail, newest first, holding at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct CommandLog {
    entries: VecDeque<CommandLogEntry>,
    capacity: NonZeroUsize,
}

impl CommandLog {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    pub fn record(&mut self, entry: CommandLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity.get());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> Vec<CommandLogEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Caller-facing result of a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_entry: Option<CommandLogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub rejection: Option<CommandRejection>,
}

impl From<Result<Option<CommandLogEntry>, CommandRejection>> for DispatchOutcome {
    fn from(result: Result<Option<CommandLogEntry>, CommandRejection>) -> Self {
        match result {
            Ok(log_entry) => Self {
                accepted: true,
                log_entry,
                reason: None,
                message: None,
                rejection: None,
            },
            Err(rejection) => Self {
                accepted: false,
                log_entry: None,
                reason: Some(rejection.reason_code()),
                message: Some(rejection.to_string()),
                rejection: Some(rejection),
            },
        }
    }
}
