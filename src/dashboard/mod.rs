//! Live overview state: refresh loops, alert board, and fault scanner.

pub mod metrics;
pub mod refresh;
pub mod scan;

use crate::alerts::AlertBoard;
use crate::config::{CadenceConfig, SeriesConfig};
use crate::error::SimError;
use crate::simulator::Simulator;
use crate::telemetry::{CurrentReadings, TimeSeries};
use chrono::Utc;
use tokio::sync::watch;
use tracing::info;

pub use self::metrics::{KeyMetrics, KEY_METRICS};
pub use self::refresh::{spawn_refresh, RefreshHandle};
pub use self::scan::{FaultScanner, ScanReport};

/// State of the overview screen for as long as it is open.
///
/// Each channel is seeded on start and replaced wholesale by its own loop:
/// readings every 3 s, header health every 5 s, series every 30 s (defaults).
/// The loops share no state. Dropping the session stops all of them.
pub struct DashboardSession {
    pub readings: watch::Receiver<CurrentReadings>,
    pub header_health: watch::Receiver<i64>,
    pub series: watch::Receiver<TimeSeries>,
    pub alerts: AlertBoard,
    pub scanner: FaultScanner,
    loops: Vec<RefreshHandle>,
}

impl DashboardSession {
    /// Seed every view and start the refresh loops.
    ///
    /// Must be called from within a tokio runtime. Fails only on an invalid
    /// series window, before anything is spawned.
    pub fn start(
        sim: &Simulator,
        cadence: &CadenceConfig,
        window: &SeriesConfig,
    ) -> Result<Self, SimError> {
        let (hours, interval) = (window.hours, window.interval_minutes);
        let initial_series = sim.time_series(hours, interval)?;
        let initial_readings = sim.current_readings();

        let (readings_tx, readings) = watch::channel(initial_readings.clone());
        let (header_tx, header_health) = watch::channel(initial_readings.overall_health);
        let (series_tx, series) = watch::channel(initial_series);

        let loops = vec![
            spawn_refresh("readings", cadence.readings_period(), readings_tx, {
                let sim = sim.clone();
                move || Ok(sim.current_readings())
            }),
            spawn_refresh("header", cadence.header_period(), header_tx, {
                let sim = sim.clone();
                move || Ok(sim.current_readings().overall_health)
            }),
            spawn_refresh("series", cadence.series_period(), series_tx, {
                let sim = sim.clone();
                move || sim.time_series(hours, interval)
            }),
        ];

        info!(
            readings_secs = cadence.readings_secs,
            header_secs = cadence.header_secs,
            series_secs = cadence.series_secs,
            hours,
            interval,
            "Dashboard session started"
        );

        Ok(Self {
            readings,
            header_health,
            series,
            alerts: AlertBoard::new(Utc::now()),
            scanner: FaultScanner::new(sim.clone(), cadence.scan_delay()),
            loops,
        })
    }

    pub fn running_loops(&self) -> usize {
        self.loops.iter().filter(|l| l.is_running()).count()
    }

    /// Stop every loop and wait for them to exit.
    pub async fn shutdown(mut self) {
        for handle in self.loops.drain(..) {
            handle.stop().await;
        }
        info!("Dashboard session stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn session() -> DashboardSession {
        DashboardSession::start(
            &Simulator::new(Some(12)),
            &CadenceConfig::default(),
            &SeriesConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_seeds_every_view() {
        let s = session();
        assert_eq!(s.series.borrow().len(), 25);
        assert_eq!(*s.header_health.borrow(), s.readings.borrow().overall_health);
        assert_eq!(s.alerts.alerts().len(), 3);
        assert_eq!(s.scanner.current().len(), 8);
        assert_eq!(s.running_loops(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loops_run_on_independent_cadences() {
        // Seeded values count as already seen.
        let s = session();
        assert!(!s.readings.has_changed().unwrap());

        sleep(Duration::from_millis(3_100)).await;
        assert!(s.readings.has_changed().unwrap());
        assert!(!s.header_health.has_changed().unwrap());
        assert!(!s.series.has_changed().unwrap());

        sleep(Duration::from_secs(2)).await;
        assert!(s.header_health.has_changed().unwrap());
        assert!(!s.series.has_changed().unwrap());

        sleep(Duration::from_secs(25)).await;
        assert!(s.series.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_closes_channels() {
        let s = session();
        let readings = s.readings.clone();
        s.shutdown().await;
        assert!(readings.has_changed().is_err());
    }

    #[tokio::test]
    async fn test_invalid_window_spawns_nothing() {
        let window = SeriesConfig { hours: 12, interval_minutes: 0 };
        let result = DashboardSession::start(
            &Simulator::new(Some(1)),
            &CadenceConfig::default(),
            &window,
        );
        assert!(matches!(result, Err(SimError::InvalidWindow { .. })));
    }
}
