// Telemetry engine - Synthetic sensor feed over a rolling window
use crate::domain::assessment::{assess, ChannelReading};
use crate::domain::telemetry::{Channel, ExportRow, Sample, TelemetryWindow};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::num::NonZeroUsize;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub window_len: NonZeroUsize,
    /// Gap between consecutive samples of the seeded history.
    pub history_spacing: Duration,
    /// Fixed RNG seed for a reproducible feed; entropy when `None`.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedState {
    Live,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStatus {
    pub state: FeedState,
    pub window_len: usize,
    pub last_update: DateTime<Utc>,
    pub generation: u64,
    pub readings: Vec<ChannelReading>,
}

pub struct TelemetryEngine {
    window: TelemetryWindow,
    rng: StdRng,
    state: FeedState,
    last_update: DateTime<Utc>,
    generation: u64,
}

impl TelemetryEngine {
    /// Seed a full window whose newest sample is stamped `now`.
    pub fn new(settings: &EngineSettings, now: DateTime<Utc>) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let oldest = settings.window_len.get() - 1;
        let first = seed_sample(&mut rng, now, settings.history_spacing, oldest);
        let mut window = TelemetryWindow::new(first, settings.window_len);
        for back in (0..oldest).rev() {
            window.push(seed_sample(&mut rng, now, settings.history_spacing, back));
        }

        tracing::info!(
            "Telemetry engine seeded with {} samples ending at {}",
            window.len(),
            now
        );

        Self {
            window,
            rng,
            state: FeedState::Live,
            last_update: now,
            generation: 0,
        }
    }

    /// Run one update step. Returns false, leaving the window untouched, while paused.
    pub fn step(&mut self, now: DateTime<Utc>) -> bool {
        if self.state == FeedState::Paused {
            return false;
        }

        let previous = self.window.latest();
        // Never let the newest timestamp fall behind the one before it.
        let timestamp = now.max(previous.timestamp);
        let rng = &mut self.rng;
        let next = Sample::from_fn(timestamp, |channel| {
            let spec = channel.spec();
            let drift = rng.gen_range(-spec.delta..=spec.delta);
            spec.valid.clamp(previous.get(channel) + drift)
        });

        self.window.push(next);
        self.last_update = timestamp;
        self.generation += 1;

        tracing::debug!(
            "Telemetry step {} applied at {}",
            self.generation,
            timestamp
        );

        true
    }

    pub fn is_live(&self) -> bool {
        self.state == FeedState::Live
    }

    pub fn set_live(&mut self, live: bool) {
        let next = if live { FeedState::Live } else { FeedState::Paused };
        if next != self.state {
            tracing::info!("Telemetry feed {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Flip between live and paused, returning whether the feed is now live.
    pub fn toggle_live(&mut self) -> bool {
        self.set_live(!self.is_live());
        self.is_live()
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.window.snapshot()
    }

    pub fn latest(&self) -> &Sample {
        self.window.latest()
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.window.iter().map(ExportRow::from_sample).collect()
    }

    pub fn status(&self) -> MonitoringStatus {
        MonitoringStatus {
            state: self.state,
            window_len: self.window.len(),
            last_update: self.last_update,
            generation: self.generation,
            readings: assess(self.window.latest()),
        }
    }
}

/// Plausible startup sample `back` spacings before `now`.
fn seed_sample(rng: &mut StdRng, now: DateTime<Utc>, spacing: Duration, back: usize) -> Sample {
    // Offsets past the representable range saturate to the earliest instant.
    let timestamp = i32::try_from(back)
        .ok()
        .and_then(|back| spacing.checked_mul(back))
        .and_then(|offset| now.checked_sub_signed(offset))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    Sample::from_fn(timestamp, |channel: Channel| {
        let spec = channel.spec();
        let seed = spec.seed;
        let phase = (back as f64 * seed.phase_rate).sin() * seed.phase_amplitude;
        spec.valid
            .clamp(seed.baseline + rng.gen_range(0.0..=seed.spread) + phase)
    })
}
