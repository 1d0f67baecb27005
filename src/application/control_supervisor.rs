// Control supervisor - Gated actuator configuration with an audit trail
use crate::domain::command::{Command, CommandLog, CommandLogEntry, CommandRejection};
use crate::domain::control::{ControlState, DEFAULT_CONTROL_STATE};
use crate::domain::preset::find_preset;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorStatus {
    pub state: ControlState,
    pub last_command: Option<String>,
    pub camera_refreshes: u64,
}

/// Sole owner of the actuator configuration and the command log.
///
/// Every mutation goes through [`ControlSupervisor::dispatch`], which enforces
/// the emergency-stop interlock before anything is applied.
pub struct ControlSupervisor {
    state: ControlState,
    log: CommandLog,
    last_command: Option<String>,
    camera_refreshes: u64,
}

impl ControlSupervisor {
    pub fn new(history_capacity: NonZeroUsize) -> Self {
        Self {
            state: DEFAULT_CONTROL_STATE,
            log: CommandLog::new(history_capacity),
            last_command: None,
            camera_refreshes: 0,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Accepted commands, newest first.
    pub fn history(&self) -> Vec<CommandLogEntry> {
        self.log.entries()
    }

    pub fn status(&self) -> SupervisorStatus {
        SupervisorStatus {
            state: self.state,
            last_command: self.last_command.clone(),
            camera_refreshes: self.camera_refreshes,
        }
    }

    /// Validate and apply `command`.
    ///
    /// Accepted commands return the log entry they appended; `clearHistory`
    /// is accepted without one. Rejected commands change nothing.
    pub fn dispatch(
        &mut self,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<Option<CommandLogEntry>, CommandRejection> {
        match self.execute(&command, now) {
            Ok(Some(entry)) => {
                tracing::info!("{}: {}", entry.command_name, entry.summary);
                Ok(Some(entry))
            }
            Ok(None) => {
                tracing::info!("{}: command history cleared", command.name());
                Ok(None)
            }
            Err(rejection) => {
                tracing::warn!(
                    "{} rejected ({}): {}",
                    command.name(),
                    rejection.reason_code(),
                    rejection
                );
                Err(rejection)
            }
        }
    }

    fn execute(
        &mut self,
        command: &Command,
        now: DateTime<Utc>,
    ) -> Result<Option<CommandLogEntry>, CommandRejection> {
        if self.state.system.emergency_stop && command.blocked_by_emergency_stop() {
            return Err(CommandRejection::EmergencyStopActive);
        }

        let summary = match command {
            Command::SetLightField(field) => self.state.lighting.apply(field)?,
            Command::SetPumpField(field) => self.state.pump.apply(field)?,
            Command::SetSystemField(field) => self.state.system.apply(field),
            Command::EmergencyStop => {
                self.state.trip_emergency_stop();
                "EMERGENCY STOP ACTIVATED".to_string()
            }
            Command::Reset => {
                self.state = DEFAULT_CONTROL_STATE;
                "System reset to default settings".to_string()
            }
            Command::ApplyPreset(name) => {
                let preset = find_preset(name)
                    .ok_or_else(|| CommandRejection::UnknownPreset(name.clone()))?;
                self.state.lighting.patch(&preset.lighting);
                self.state.pump.patch(&preset.pump);
                preset.summary.to_string()
            }
            Command::ClearHistory => {
                self.log.clear();
                return Ok(None);
            }
            Command::RefreshCamera => {
                self.camera_refreshes += 1;
                "Webcam feed refreshed".to_string()
            }
        };

        let entry = CommandLogEntry {
            timestamp: now,
            command_name: command.name(),
            summary,
        };
        self.log.record(entry.clone());
        self.last_command = Some(entry.summary.clone());

        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::{ActuatorField, SystemField};
    use crate::domain::control::{LightingMode, PumpMode};
    use chrono::{Duration, TimeZone};

    fn supervisor() -> ControlSupervisor {
        ControlSupervisor::new(NonZeroUsize::new(10).unwrap())
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    #[test]
    fn test_field_updates_are_logged() {
        let mut sup = supervisor();

        let entry = sup
            .dispatch(Command::SetPumpField(ActuatorField::Mode("interval".to_string())), at(1))
            .unwrap()
            .unwrap();

        assert_eq!(entry.command_name, "setPumpField");
        assert_eq!(entry.summary, "Water pump mode set to interval");
        assert_eq!(entry.timestamp, at(1));
        assert_eq!(sup.state().pump.mode, PumpMode::Interval);
        assert_eq!(sup.history(), vec![entry]);
    }

    #[test]
    fn test_numeric_fields_are_clamped_not_rejected() {
        let mut sup = supervisor();

        assert!(sup.dispatch(Command::SetLightField(ActuatorField::Level(250.0)), at(1)).is_ok());
        assert!(sup.dispatch(Command::SetPumpField(ActuatorField::Level(3.0)), at(2)).is_ok());

        assert_eq!(sup.state().lighting.level, 100.0);
        assert_eq!(sup.state().pump.level, 20.0);
        assert_eq!(sup.history()[0].summary, "Water pump flow rate set to 20");
    }

    #[test]
    fn test_unknown_mode_is_rejected_and_not_logged() {
        let mut sup = supervisor();

        let result = sup.dispatch(
            Command::SetLightField(ActuatorField::Mode("disco".to_string())),
            at(1),
        );

        assert_eq!(result.unwrap_err().reason_code(), "unknown_mode");
        assert_eq!(sup.state().lighting.mode, LightingMode::Auto);
        assert!(sup.history().is_empty());
        assert_eq!(sup.status().last_command, None);
    }

    #[test]
    fn test_emergency_stop_interlock() {
        let mut sup = supervisor();

        let entry = sup.dispatch(Command::EmergencyStop, at(1)).unwrap().unwrap();
        assert_eq!(entry.summary, "EMERGENCY STOP ACTIVATED");

        let state = sup.state();
        assert!(!state.lighting.enabled);
        assert!(!state.pump.enabled);
        assert!(state.system.emergency_stop);

        let blocked = [
            Command::SetLightField(ActuatorField::Enabled(true)),
            Command::SetPumpField(ActuatorField::Level(90.0)),
            Command::SetSystemField(SystemField::AutoMode(false)),
            Command::ApplyPreset("growth-boost".to_string()),
            Command::EmergencyStop,
        ];
        for command in blocked {
            assert_eq!(
                sup.dispatch(command, at(2)),
                Err(CommandRejection::EmergencyStopActive)
            );
        }

        assert_eq!(sup.state(), state);
        assert_eq!(sup.history().len(), 1);

        sup.dispatch(Command::Reset, at(3)).unwrap();
        assert!(!sup.state().system.emergency_stop);
        assert!(sup
            .dispatch(Command::SetLightField(ActuatorField::Level(50.0)), at(4))
            .is_ok());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut sup = supervisor();
        sup.dispatch(Command::ApplyPreset("maintenance".to_string()), at(1)).unwrap();
        sup.dispatch(Command::EmergencyStop, at(2)).unwrap();

        sup.dispatch(Command::Reset, at(3)).unwrap();
        let first = sup.state();
        sup.dispatch(Command::Reset, at(4)).unwrap();

        assert_eq!(first, DEFAULT_CONTROL_STATE);
        assert_eq!(sup.state(), DEFAULT_CONTROL_STATE);
        assert!(!sup.state().system.emergency_stop);
    }

    #[test]
    fn test_history_keeps_ten_most_recent() {
        let mut sup = supervisor();
        for n in 0..15 {
            sup.dispatch(Command::SetLightField(ActuatorField::Level(n as f64)), at(n))
                .unwrap();
        }

        let history = sup.history();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].summary, "Light intensity set to 14");
        assert_eq!(history[9].summary, "Light intensity set to 5");
        assert!(history.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[test]
    fn test_preset_is_one_logged_command() {
        let mut sup = supervisor();

        let entry = sup
            .dispatch(Command::ApplyPreset("growth-boost".to_string()), at(1))
            .unwrap()
            .unwrap();

        assert_eq!(sup.state().lighting.level, 100.0);
        assert_eq!(sup.state().pump.level, 80.0);
        assert_eq!(entry.command_name, "applyPreset");
        assert_eq!(entry.summary, "Growth boost mode activated");
        assert_eq!(sup.history().len(), 1);
    }

    #[test]
    fn test_maintenance_preset_disables_actuators() {
        let mut sup = supervisor();
        sup.dispatch(Command::ApplyPreset("maintenance".to_string()), at(1)).unwrap();

        assert!(!sup.state().lighting.enabled);
        assert!(!sup.state().pump.enabled);
        assert!(!sup.state().system.emergency_stop);
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let mut sup = supervisor();
        let result = sup.dispatch(Command::ApplyPreset("turbo".to_string()), at(1));

        assert_eq!(result, Err(CommandRejection::UnknownPreset("turbo".to_string())));
        assert_eq!(sup.state(), DEFAULT_CONTROL_STATE);
        assert!(sup.history().is_empty());
    }

    #[test]
    fn test_clear_history_keeps_last_command() {
        let mut sup = supervisor();
        sup.dispatch(Command::SetSystemField(SystemField::AutoMode(false)), at(1)).unwrap();

        assert_eq!(sup.dispatch(Command::ClearHistory, at(2)), Ok(None));
        assert!(sup.history().is_empty());
        assert!(!sup.state().system.auto_mode);
        assert_eq!(
            sup.status().last_command.as_deref(),
            Some("System auto mode set to off")
        );
    }

    #[test]
    fn test_camera_refresh_allowed_during_emergency_stop() {
        let mut sup = supervisor();
        sup.dispatch(Command::EmergencyStop, at(1)).unwrap();

        let entry = sup.dispatch(Command::RefreshCamera, at(2)).unwrap().unwrap();
        assert_eq!(entry.summary, "Webcam feed refreshed");
        assert_eq!(sup.status().camera_refreshes, 1);
        assert!(sup.state().system.emergency_stop);
    }
}
