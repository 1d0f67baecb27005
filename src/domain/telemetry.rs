// Telemetry domain models
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::iter;
use std::num::NonZeroUsize;

/// One named numeric measurement carried by every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    ExternalTemp,
    WaterTemp,
    Ph,
    Tds,
    LightLevel1,
    LightLevel2,
    LightLevel3,
    LightLevel4,
}

impl Channel {
    /// Channels in export column order.
    pub const ALL: [Channel; 8] = [
        Channel::ExternalTemp,
        Channel::WaterTemp,
        Channel::Ph,
        Channel::Tds,
        Channel::LightLevel1,
        Channel::LightLevel2,
        Channel::LightLevel3,
        Channel::LightLevel4,
    ];

    pub fn spec(self) -> &'static ChannelSpec {
        &CHANNEL_SPECS[self as usize]
    }

    /// Stable key, also used as the export column name.
    pub fn key(self) -> &'static str {
        self.spec().key
    }
}

/// Closed interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lo: f64,
    pub hi: f64,
}

impl Bounds {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.lo;
        }
        value.clamp(self.lo, self.hi)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

/// Startup profile of a channel: `baseline + uniform(0, spread) + sin(i * phase_rate) * phase_amplitude`,
/// where `i` counts samples back from the newest.
#[derive(Debug, Clone, Copy)]
pub struct SeedProfile {
    pub baseline: f64,
    pub spread: f64,
    pub phase_rate: f64,
    pub phase_amplitude: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    pub key: &'static str,
    pub unit: &'static str,
    /// Decimal places used when exporting.
    pub precision: usize,
    /// Every stored value is clamped into this range.
    pub valid: Bounds,
    /// Band considered healthy, if the channel has one.
    pub target: Option<Bounds>,
    /// Maximum random-walk step per update, in either direction.
    pub delta: f64,
    pub seed: SeedProfile,
}

const fn light_spec(key: &'static str, delta: f64, seed: SeedProfile) -> ChannelSpec {
    ChannelSpec {
        key,
        unit: "lux",
        precision: 0,
        valid: Bounds::new(0.0, f64::INFINITY),
        target: None,
        delta,
        seed,
    }
}

/// Indexed by `Channel as usize`.
pub static CHANNEL_SPECS: [ChannelSpec; 8] = [
    ChannelSpec {
        key: "external_temp",
        unit: "°C",
        precision: 2,
        valid: Bounds::new(-10.0, 50.0),
        target: Some(Bounds::new(15.0, 35.0)),
        delta: 1.0,
        seed: SeedProfile { baseline: 18.0, spread: 8.0, phase_rate: 0.5, phase_amplitude: 3.0 },
    },
    ChannelSpec {
        key: "water_temp",
        unit: "°C",
        precision: 2,
        valid: Bounds::new(0.0, 40.0),
        target: Some(Bounds::new(18.0, 24.0)),
        delta: 0.5,
        seed: SeedProfile { baseline: 20.0, spread: 4.0, phase_rate: 0.3, phase_amplitude: 2.0 },
    },
    ChannelSpec {
        key: "ph",
        unit: "",
        precision: 2,
        valid: Bounds::new(5.5, 7.0),
        target: Some(Bounds::new(5.5, 6.5)),
        delta: 0.1,
        seed: SeedProfile { baseline: 6.0, spread: 1.0, phase_rate: 0.0, phase_amplitude: 0.0 },
    },
    ChannelSpec {
        key: "tds",
        unit: "ppm",
        precision: 0,
        valid: Bounds::new(600.0, 1400.0),
        target: Some(Bounds::new(800.0, 1200.0)),
        delta: 25.0,
        seed: SeedProfile { baseline: 800.0, spread: 400.0, phase_rate: 0.0, phase_amplitude: 0.0 },
    },
    light_spec(
        "light_level_1",
        15.0,
        SeedProfile { baseline: 300.0, spread: 200.0, phase_rate: 0.8, phase_amplitude: 100.0 },
    ),
    light_spec(
        "light_level_2",
        12.5,
        SeedProfile { baseline: 280.0, spread: 180.0, phase_rate: 0.7, phase_amplitude: 90.0 },
    ),
    light_spec(
        "light_level_3",
        17.5,
        SeedProfile { baseline: 320.0, spread: 220.0, phase_rate: 0.9, phase_amplitude: 110.0 },
    ),
    light_spec(
        "light_level_4",
        14.0,
        SeedProfile { baseline: 290.0, spread: 190.0, phase_rate: 0.6, phase_amplitude: 95.0 },
    ),
];

/// One timestamped set of channel readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub external_temp: f64,
    pub water_temp: f64,
    pub ph: f64,
    pub tds: f64,
    pub light_level_1: f64,
    pub light_level_2: f64,
    pub light_level_3: f64,
    pub light_level_4: f64,
}

impl Sample {
    /// Build a sample by evaluating `value` once per channel, in `Channel::ALL` order.
    pub fn from_fn(timestamp: DateTime<Utc>, mut value: impl FnMut(Channel) -> f64) -> Self {
        Self {
            timestamp,
            external_temp: value(Channel::ExternalTemp),
            water_temp: value(Channel::WaterTemp),
            ph: value(Channel::Ph),
            tds: value(Channel::Tds),
            light_level_1: value(Channel::LightLevel1),
            light_level_2: value(Channel::LightLevel2),
            light_level_3: value(Channel::LightLevel3),
            light_level_4: value(Channel::LightLevel4),
        }
    }

    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::ExternalTemp => self.external_temp,
            Channel::WaterTemp => self.water_temp,
            Channel::Ph => self.ph,
            Channel::Tds => self.tds,
            Channel::LightLevel1 => self.light_level_1,
            Channel::LightLevel2 => self.light_level_2,
            Channel::LightLevel3 => self.light_level_3,
            Channel::LightLevel4 => self.light_level_4,
        }
    }
}

/// Rolling buffer of samples, oldest first.
///
/// The newest sample is held outside the history queue, so a window can
/// never be empty and `latest()` needs no runtime check.
#[derive(Debug, Clone)]
pub struct TelemetryWindow {
    history: VecDeque<Sample>,
    latest: Sample,
    capacity: NonZeroUsize,
}

impl TelemetryWindow {
    pub fn new(first: Sample, capacity: NonZeroUsize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity.get() - 1),
            latest: first,
            capacity,
        }
    }

    /// Append `sample` as the newest entry, evicting the oldest once full.
    pub fn push(&mut self, sample: Sample) {
        let previous = std::mem::replace(&mut self.latest, sample);
        self.history.push_back(previous);
        while self.history.len() >= self.capacity.get() {
            self.history.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.history.len() + 1
    }

    pub fn latest(&self) -> &Sample {
        &self.latest
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.history.iter().chain(iter::once(&self.latest))
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.iter().cloned().collect()
    }
}

/// Flat, display-formatted row of the exported table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub timestamp: String,
    pub external_temp: String,
    pub water_temp: String,
    pub ph: String,
    pub tds: String,
    pub light_level_1: String,
    pub light_level_2: String,
    pub light_level_3: String,
    pub light_level_4: String,
}

impl ExportRow {
    /// Export header: `timestamp` followed by each channel key.
    pub fn columns() -> [&'static str; 9] {
        let mut columns = ["timestamp"; 9];
        for (column, channel) in columns[1..].iter_mut().zip(Channel::ALL) {
            *column = channel.key();
        }
        columns
    }

    pub fn from_sample(sample: &Sample) -> Self {
        let fmt = |channel: Channel| {
            format!("{:.*}", channel.spec().precision, sample.get(channel))
        };

        Self {
            timestamp: sample.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            external_temp: fmt(Channel::ExternalTemp),
            water_temp: fmt(Channel::WaterTemp),
            ph: fmt(Channel::Ph),
            tds: fmt(Channel::Tds),
            light_level_1: fmt(Channel::LightLevel1),
            light_level_2: fmt(Channel::LightLevel2),
            light_level_3: fmt(Channel::LightLevel3),
            light_level_4: fmt(Channel::LightLevel4),
        }
    }

    /// Field values in `columns()` order.
    pub fn fields(&self) -> [&str; 9] {
        [
            self.timestamp.as_str(),
            self.external_temp.as_str(),
            self.water_temp.as_str(),
            self.ph.as_str(),
            self.tds.as_str(),
            self.light_level_1.as_str(),
            self.light_level_2.as_str(),
            self.light_level_3.as_str(),
            self.light_level_4.as_str(),
        ]
    }
}

/// Export rows in tabular form: the column header plus one value array per sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub columns: [&'static str; 9],
    pub rows: Vec<[String; 9]>,
}

impl ExportTable {
    pub fn from_rows(rows: &[ExportRow]) -> Self {
        Self {
            columns: ExportRow::columns(),
            rows: rows.iter().map(|row| row.fields().map(str::to_owned)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_at(hour: i64, value: f64) -> Sample {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + Duration::hours(hour);
        Sample::from_fn(ts, |_| value)
    }

    #[test]
    fn test_window_evicts_oldest_at_capacity() {
        let mut window = TelemetryWindow::new(sample_at(0, 0.0), NonZeroUsize::new(3).unwrap());
        assert_eq!(window.len(), 1);

        for hour in 1..6 {
            window.push(sample_at(hour, hour as f64));
            assert!(window.len() <= 3);
        }

        assert_eq!(window.len(), 3);
        assert_eq!(window.snapshot()[0].tds, 3.0);
        assert_eq!(window.latest().tds, 5.0);

        let values: Vec<f64> = window.iter().map(|s| s.ph).collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_window_of_one_keeps_only_latest() {
        let mut window = TelemetryWindow::new(sample_at(0, 1.0), NonZeroUsize::new(1).unwrap());
        window.push(sample_at(1, 2.0));

        assert_eq!(window.len(), 1);
        assert_eq!(window.snapshot()[0].water_temp, 2.0);
    }

    #[test]
    fn test_bounds_clamp() {
        let ph = Channel::Ph.spec().valid;
        assert_eq!(ph.clamp(4.2), 5.5);
        assert_eq!(ph.clamp(7.3), 7.0);
        assert_eq!(ph.clamp(6.1), 6.1);
        assert_eq!(ph.clamp(f64::NAN), 5.5);

        let light = Channel::LightLevel3.spec().valid;
        assert_eq!(light.clamp(-3.0), 0.0);
        assert_eq!(light.clamp(12_000.0), 12_000.0);
    }

    #[test]
    fn test_export_columns_follow_channel_keys() {
        assert_eq!(
            ExportRow::columns(),
            [
                "timestamp",
                "external_temp",
                "water_temp",
                "ph",
                "tds",
                "light_level_1",
                "light_level_2",
                "light_level_3",
                "light_level_4",
            ]
        );
    }

    #[test]
    fn test_export_row_formatting() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 13, 45, 0).unwrap();
        let sample = Sample {
            timestamp: ts,
            external_temp: 22.456,
            water_temp: 19.2,
            ph: 6.237,
            tds: 1023.7,
            light_level_1: 412.2,
            light_level_2: 0.0,
            light_level_3: 355.9,
            light_level_4: 290.4,
        };

        let row = ExportRow::from_sample(&sample);
        assert_eq!(
            row.fields(),
            [
                "2024-05-01T13:45:00.000Z",
                "22.46",
                "19.20",
                "6.24",
                "1024",
                "412",
                "0",
                "356",
                "290",
            ]
        );
    }
}
