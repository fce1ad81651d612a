//! forgewatch -- Synthetic predictive-maintenance telemetry for manufacturing dashboards.
//!
//! This crate generates sensor readings, forecast series, asset health,
//! vision micro-faults and supervisor alerts from bounded-random models,
//! and drives them on cancellable refresh loops.

pub mod alerts;
pub mod assets;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod faults;
pub mod simulator;
pub mod telemetry;

pub use error::SimError;
pub use simulator::Simulator;

use anyhow::Result;
use std::time::Duration;
use tokio::time::Instant;

/// Run the live overview until ctrl-c or `limit` elapses, printing each refresh.
pub async fn watch(cfg: &config::SimConfig, limit: Option<Duration>) -> Result<()> {
    let sim = Simulator::new(cfg.simulator.seed);
    let mut session = dashboard::DashboardSession::start(&sim, &cfg.cadence, &cfg.series)?;

    print_readings(&session.readings.borrow_and_update());
    let deadline = limit.map(|d| Instant::now() + d);

    loop {
        let until_deadline = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            _ = until_deadline => break,
            Ok(()) = session.readings.changed() => {
                print_readings(&session.readings.borrow_and_update());
            }
            Ok(()) = session.header_health.changed() => {
                let health = *session.header_health.borrow_and_update();
                println!(
                    "[header] Overall Assembly Line Health: {}% ({})",
                    telemetry::percent_display(health), header_label(health)
                );
            }
            Ok(()) = session.series.changed() => {
                let series = session.series.borrow_and_update();
                if let (Some(t), Some(s)) = (series.temperature.last(), series.structural.last()) {
                    println!(
                        "[series] {} points, latest {} temp {:.1}°C (forecast {:.1}) structural {:.1}%",
                        series.len(), t.time, t.value, t.predicted, s.value
                    );
                }
            }
        }
    }

    session.shutdown().await;
    Ok(())
}

fn header_label(health: i64) -> &'static str {
    match telemetry::health_status(health) {
        telemetry::Status::Normal => "Stable",
        telemetry::Status::Warning => "Warning",
        telemetry::Status::Critical => "Critical",
    }
}

fn print_readings(r: &telemetry::CurrentReadings) {
    println!(
        "[{}] temp {:>5.1}°C {:<8} | vib {:>5.2} mm/s {:<8} | structural {:>5.1}% {:<8} | overall {}%",
        r.temperature.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S"),
        r.temperature.value,
        r.temperature.status,
        r.vibration.value,
        r.vibration.status,
        r.structural.value,
        r.structural.status,
        telemetry::percent_display(r.overall_health),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_watch_returns_at_limit() {
        let mut cfg = config::SimConfig::default();
        cfg.simulator.seed = Some(4);

        let start = Instant::now();
        watch(&cfg, Some(Duration::from_secs(31))).await.unwrap();
        // Long enough for every loop to tick at least once.
        assert!(start.elapsed() >= Duration::from_secs(31));
    }

    #[tokio::test]
    async fn test_watch_rejects_invalid_window() {
        let mut cfg = config::SimConfig::default();
        cfg.series.interval_minutes = 0;
        let err = watch(&cfg, Some(Duration::ZERO)).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SimError>(),
            Some(&SimError::InvalidWindow { interval_minutes: 0 })
        );
    }

    #[test]
    fn test_header_label_bands() {
        assert_eq!(header_label(94), "Stable");
        assert_eq!(header_label(80), "Warning");
        assert_eq!(header_label(60), "Critical");
    }
}
