// Actuator and system configuration domain models
use super::command::{ActuatorField, CommandRejection, SystemField};
use super::preset::ActuatorPatch;
use super::telemetry::Bounds;
use serde::Serialize;
use std::fmt;

/// Operating-mode enumeration of one actuator group.
///
/// The implementing type also carries the group's display label and the
/// domain its `level` is clamped into.
pub trait ActuatorMode: Copy + PartialEq + fmt::Debug + Serialize + 'static {
    /// Label used in command summaries, e.g. "Light".
    const ACTUATOR: &'static str;
    /// What `level` means for this group, e.g. "intensity".
    const LEVEL_LABEL: &'static str;
    const LEVEL_RANGE: Bounds;
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|mode| mode.name() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingMode {
    Auto,
    Manual,
    Growth,
    Flowering,
}

impl ActuatorMode for LightingMode {
    const ACTUATOR: &'static str = "Light";
    const LEVEL_LABEL: &'static str = "intensity";
    const LEVEL_RANGE: Bounds = Bounds::new(0.0, 100.0);
    const ALL: &'static [Self] = &[Self::Auto, Self::Manual, Self::Growth, Self::Flowering];

    fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
            Self::Growth => "growth",
            Self::Flowering => "flowering",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PumpMode {
    Continuous,
    Interval,
    Timed,
    Demand,
}

impl ActuatorMode for PumpMode {
    const ACTUATOR: &'static str = "Water pump";
    const LEVEL_LABEL: &'static str = "flow rate";
    const LEVEL_RANGE: Bounds = Bounds::new(20.0, 100.0);
    const ALL: &'static [Self] = &[Self::Continuous, Self::Interval, Self::Timed, Self::Demand];

    fn name(self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Interval => "interval",
            Self::Timed => "timed",
            Self::Demand => "demand",
        }
    }
}

/// Power, level, mode and schedule flag of one actuator group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actuator<M> {
    pub enabled: bool,
    pub level: f64,
    pub mode: M,
    pub schedule_active: bool,
}

pub type Lighting = Actuator<LightingMode>;
pub type Pump = Actuator<PumpMode>;

impl<M: ActuatorMode> Actuator<M> {
    /// Store `value` clamped into the group's level domain and return what was stored.
    pub fn set_level(&mut self, value: f64) -> f64 {
        self.level = M::LEVEL_RANGE.clamp(value);
        self.level
    }

    /// Apply one field update and describe the effect.
    ///
    /// Unknown modes leave the actuator untouched.
    pub fn apply(&mut self, field: &ActuatorField) -> Result<String, CommandRejection> {
        let summary = match field {
            ActuatorField::Enabled(on) => {
                self.enabled = *on;
                format!("{} power set to {}", M::ACTUATOR, on_off(*on))
            }
            ActuatorField::Level(value) => {
                let stored = self.set_level(*value);
                format!("{} {} set to {}", M::ACTUATOR, M::LEVEL_LABEL, stored)
            }
            ActuatorField::Mode(value) => {
                let mode = M::parse(value).ok_or_else(|| CommandRejection::UnknownMode {
                    actuator: M::ACTUATOR,
                    value: value.clone(),
                })?;
                self.mode = mode;
                format!("{} mode set to {}", M::ACTUATOR, mode.name())
            }
            ActuatorField::ScheduleActive(on) => {
                self.schedule_active = *on;
                format!("{} schedule set to {}", M::ACTUATOR, on_off(*on))
            }
        };

        Ok(summary)
    }

    pub fn patch(&mut self, patch: &ActuatorPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(level) = patch.level {
            self.set_level(level);
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    pub auto_mode: bool,
    pub emergency_stop: bool,
}

impl SystemState {
    pub fn apply(&mut self, field: &SystemField) -> String {
        match field {
            SystemField::AutoMode(on) => {
                self.auto_mode = *on;
                format!("System auto mode set to {}", on_off(*on))
            }
        }
    }
}

/// Full supervisory configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlState {
    pub lighting: Lighting,
    pub pump: Pump,
    pub system: SystemState,
}

/// Configuration restored by a reset.
pub const DEFAULT_CONTROL_STATE: ControlState = ControlState {
    lighting: Actuator {
        enabled: true,
        level: 75.0,
        mode: LightingMode::Auto,
        schedule_active: true,
    },
    pump: Actuator {
        enabled: true,
        level: 60.0,
        mode: PumpMode::Continuous,
        schedule_active: false,
    },
    system: SystemState {
        auto_mode: true,
        emergency_stop: false,
    },
};

impl Default for ControlState {
    fn default() -> Self {
        DEFAULT_CONTROL_STATE
    }
}

impl ControlState {
    /// Trip the interlock: both actuators off, emergency stop latched.
    pub fn trip_emergency_stop(&mut self) {
        self.lighting.enabled = false;
        self.pump.enabled = false;
        self.system.emergency_stop = true;
    }
}
