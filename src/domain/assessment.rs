// Channel status assessment against target bands
use super::telemetry::{Channel, Sample};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelStatus {
    Optimal,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReading {
    pub channel: Channel,
    pub unit: &'static str,
    pub value: f64,
    pub status: ChannelStatus,
}

/// Grade every channel of `sample`. Channels without a target band are always optimal.
pub fn assess(sample: &Sample) -> Vec<ChannelReading> {
    Channel::ALL
        .iter()
        .map(|&channel| {
            let spec = channel.spec();
            let value = sample.get(channel);
            let status = match spec.target {
                Some(band) if !band.contains(value) => ChannelStatus::Warning,
                _ => ChannelStatus::Optimal,
            };

            ChannelReading {
                channel,
                unit: spec.unit,
                value,
                status,
            }
        })
        .collect()
}
