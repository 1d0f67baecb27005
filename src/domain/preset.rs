// Named preset bundles
//
// Each preset is a declarative patch of both actuator groups, applied as a
// single logged command.

/// Partial actuator update; `None` leaves the field as it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorPatch {
    pub enabled: Option<bool>,
    pub level: Option<f64>,
}

impl ActuatorPatch {
    pub const fn level(level: f64) -> Self {
        Self {
            enabled: None,
            level: Some(level),
        }
    }

    pub const fn power(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            level: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub summary: &'static str,
    pub lighting: ActuatorPatch,
    pub pump: ActuatorPatch,
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "growth-boost",
        summary: "Growth boost mode activated",
        lighting: ActuatorPatch::level(100.0),
        pump: ActuatorPatch::level(80.0),
    },
    Preset {
        name: "night-mode",
        summary: "Night mode activated",
        lighting: ActuatorPatch::level(40.0),
        pump: ActuatorPatch::level(40.0),
    },
    Preset {
        name: "standard",
        summary: "Standard operation mode activated",
        lighting: ActuatorPatch::level(75.0),
        pump: ActuatorPatch::level(60.0),
    },
    Preset {
        name: "maintenance",
        summary: "Maintenance mode activated",
        lighting: ActuatorPatch::power(false),
        pump: ActuatorPatch::power(false),
    },
];

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.name == name)
}
