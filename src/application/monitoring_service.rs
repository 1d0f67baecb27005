// Monitoring service - Shared access to the telemetry engine
use crate::application::clock::Clock;
use crate::application::telemetry_engine::{MonitoringStatus, TelemetryEngine};
use crate::domain::telemetry::{ExportRow, Sample};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle; all clones share one engine behind a lock.
#[derive(Clone)]
pub struct MonitoringService {
    engine: Arc<RwLock<TelemetryEngine>>,
    clock: Arc<dyn Clock>,
}

impl MonitoringService {
    pub fn new(engine: TelemetryEngine, clock: Arc<dyn Clock>) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            clock,
        }
    }

    /// Apply one update step stamped with the current clock reading.
    pub async fn tick(&self) -> bool {
        let now = self.clock.now();
        self.engine.write().await.step(now)
    }

    pub async fn snapshot(&self) -> Vec<Sample> {
        self.engine.read().await.snapshot()
    }

    pub async fn latest(&self) -> Sample {
        self.engine.read().await.latest().clone()
    }

    pub async fn export_rows(&self) -> Vec<ExportRow> {
        self.engine.read().await.export_rows()
    }

    pub async fn status(&self) -> MonitoringStatus {
        self.engine.read().await.status()
    }

    pub async fn set_live(&self, live: bool) -> MonitoringStatus {
        let mut engine = self.engine.write().await;
        engine.set_live(live);
        engine.status()
    }

    pub async fn toggle_live(&self) -> bool {
        self.engine.write().await.toggle_live()
    }
}
