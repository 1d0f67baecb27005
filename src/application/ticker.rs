// Periodic telemetry ticker
use crate::application::monitoring_service::MonitoringService;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Drive `service` with one update step per `period`.
///
/// The first step fires one full period after spawning. Each step finishes
/// under the engine's write lock before the next tick is awaited, and ticks
/// missed while a step was running are dropped rather than queued. Paused
/// feeds keep ticking; the engine ignores the steps. Abort the handle to stop.
pub fn spawn_ticker(service: MonitoringService, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(start) = Instant::now().checked_add(period) else {
            tracing::error!("Tick period {:?} is out of range, ticker not started", period);
            return;
        };
        let mut interval = time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            service.tick().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::testing::ManualClock;
    use crate::application::telemetry_engine::{EngineSettings, TelemetryEngine};
    use crate::application::clock::Clock;
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    fn service() -> MonitoringService {
        let clock = Arc::new(ManualClock::starting_at_noon());
        let settings = EngineSettings {
            window_len: NonZeroUsize::new(24).unwrap(),
            history_spacing: chrono::Duration::hours(1),
            seed: Some(99),
        };
        let engine = TelemetryEngine::new(&settings, clock.now());
        MonitoringService::new(engine, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_steps_once_per_period() {
        let service = service();
        let handle = spawn_ticker(service.clone(), Duration::from_secs(5));

        time::sleep(Duration::from_secs(4)).await;
        assert_eq!(service.status().await.generation, 0);

        time::sleep(Duration::from_secs(7)).await;
        assert_eq!(service.status().await.generation, 2);
        assert_eq!(service.snapshot().await.len(), 24);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_period_exits_without_panicking() {
        let service = service();
        let handle = spawn_ticker(service.clone(), Duration::MAX);

        assert!(handle.await.is_ok());
        assert_eq!(service.status().await.generation, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_feed_ignores_ticks_until_resumed() {
        let service = service();
        let handle = spawn_ticker(service.clone(), Duration::from_secs(5));

        time::sleep(Duration::from_secs(6)).await;
        assert_eq!(service.status().await.generation, 1);

        service.set_live(false).await;
        let frozen = service.snapshot().await;
        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(service.snapshot().await, frozen);
        assert_eq!(service.status().await.generation, 1);

        // Resumed at t=26s; the next tick lands at t=30s.
        service.set_live(true).await;
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(service.status().await.generation, 2);

        handle.abort();
    }
}
