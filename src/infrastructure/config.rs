use crate::application::telemetry_engine::EngineSettings;
use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "config/hydroponics";

const MAX_WINDOW_LEN: usize = 10_000;
const MAX_HISTORY_SPACING_SECS: i64 = 86_400;
const MAX_TICK_INTERVAL_SECS: u64 = 86_400;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub telemetry: TelemetrySettings,
    pub control: ControlSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    pub window_len: usize,
    pub tick_interval_secs: u64,
    pub history_spacing_secs: i64,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ControlSettings {
    pub history_capacity: usize,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(DEFAULT_CONFIG_FILE)
}

/// Defaults, overlaid by the optional file at `path`, overlaid by `HYDRO__*` env vars.
pub fn load_settings_from(path: &str) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .set_default("server.bind_addr", "0.0.0.0:8080")?
        .set_default("telemetry.window_len", 24)?
        .set_default("telemetry.tick_interval_secs", 5)?
        .set_default("telemetry.history_spacing_secs", 3600)?
        .set_default("control.history_capacity", 10)?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("HYDRO")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to load settings from {}", path))?;

    Ok(settings.try_deserialize()?)
}

impl Settings {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid server.bind_addr '{}'", self.server.bind_addr))
    }

    pub fn engine_settings(&self) -> anyhow::Result<EngineSettings> {
        let window_len = NonZeroUsize::new(self.telemetry.window_len)
            .context("telemetry.window_len must be at least 1")?;
        if window_len.get() > MAX_WINDOW_LEN {
            anyhow::bail!("telemetry.window_len must be at most {}", MAX_WINDOW_LEN);
        }
        if !(1..=MAX_HISTORY_SPACING_SECS).contains(&self.telemetry.history_spacing_secs) {
            anyhow::bail!(
                "telemetry.history_spacing_secs must be between 1 and {}",
                MAX_HISTORY_SPACING_SECS
            );
        }

        Ok(EngineSettings {
            window_len,
            history_spacing: chrono::Duration::seconds(self.telemetry.history_spacing_secs),
            seed: self.telemetry.seed,
        })
    }

    pub fn tick_interval(&self) -> anyhow::Result<Duration> {
        if !(1..=MAX_TICK_INTERVAL_SECS).contains(&self.telemetry.tick_interval_secs) {
            anyhow::bail!(
                "telemetry.tick_interval_secs must be between 1 and {}",
                MAX_TICK_INTERVAL_SECS
            );
        }
        Ok(Duration::from_secs(self.telemetry.tick_interval_secs))
    }

    pub fn history_capacity(&self) -> anyhow::Result<NonZeroUsize> {
        NonZeroUsize::new(self.control.history_capacity)
            .context("control.history_capacity must be at least 1")
    }
}
