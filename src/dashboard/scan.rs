//! Simulated vision scan with a re-entrancy guard.

use crate::error::SimError;
use crate::faults::{FaultSeverity, MicroFault};
use crate::simulator::Simulator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

/// Result of one completed scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub faults: Vec<MicroFault>,
}

/// Clears the busy flag on drop, including when a scan task is aborted.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Holds the current fault batch and swaps in a new one after each scan.
#[derive(Clone)]
pub struct FaultScanner {
    sim: Simulator,
    delay: Duration,
    busy: Arc<AtomicBool>,
    faults: Arc<watch::Sender<Vec<MicroFault>>>,
}

impl FaultScanner {
    /// Create a scanner seeded with an initial batch.
    pub fn new(sim: Simulator, delay: Duration) -> Self {
        let (tx, _) = watch::channel(sim.micro_faults());
        Self {
            sim,
            delay,
            busy: Arc::new(AtomicBool::new(false)),
            faults: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<MicroFault>> {
        self.faults.subscribe()
    }

    pub fn current(&self) -> Vec<MicroFault> {
        self.faults.borrow().clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn claim(&self) -> Result<BusyGuard, SimError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SimError::ScanInProgress)?;
        Ok(BusyGuard(self.busy.clone()))
    }

    /// Run a scan to completion.
    pub async fn scan(&self) -> Result<ScanReport, SimError> {
        let guard = self.claim()?;
        Ok(self.clone().run(guard).await)
    }

    /// Start a scan in the background. Fails while another scan is pending.
    pub fn start(&self) -> Result<JoinHandle<ScanReport>, SimError> {
        let guard = self.claim()?;
        Ok(tokio::spawn(self.clone().run(guard)))
    }

    async fn run(self, guard: BusyGuard) -> ScanReport {
        let id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(scan = %id, delay_ms = self.delay.as_millis() as u64, "Scan started");

        tokio::time::sleep(self.delay).await;

        let faults = self.sim.micro_faults();
        self.faults.send_replace(faults.clone());
        drop(guard);

        let critical = faults
            .iter()
            .filter(|f| f.severity == FaultSeverity::Critical)
            .count();
        info!(scan = %id, faults = faults.len(), critical, "Scan complete");

        ScanReport {
            id,
            started_at,
            completed_at: Utc::now(),
            faults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn scanner() -> FaultScanner {
        FaultScanner::new(Simulator::new(Some(8)), Duration::from_secs(2))
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_swaps_batch_after_delay() {
        let scanner = scanner();
        let initial = scanner.current();
        assert_eq!(initial.len(), 8);

        let start = Instant::now();
        let report = scanner.scan().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));

        assert_eq!(report.faults.len(), 8);
        assert_eq!(scanner.current(), report.faults);
        assert!(!scanner.is_scanning());
        assert!(report.completed_at >= report.started_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_scan_rejected_while_pending() {
        let scanner = scanner();
        let mut rx = scanner.subscribe();

        let handle = scanner.start().unwrap();
        assert!(scanner.is_scanning());
        assert_eq!(scanner.start().unwrap_err(), SimError::ScanInProgress);
        assert_eq!(scanner.scan().await.unwrap_err(), SimError::ScanInProgress);

        let report = handle.await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), report.faults);

        // Guard released, a new scan may start.
        assert!(!scanner.is_scanning());
        assert!(scanner.start().is_ok());
    }

    #[test]
    fn test_zero_delay_scan_blocking() {
        let scanner = FaultScanner::new(Simulator::new(Some(2)), Duration::ZERO);
        let report = tokio_test::block_on(scanner.scan()).unwrap();
        assert_eq!(report.faults.len(), 8);
        assert!(report.faults.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_scan_releases_guard() {
        let scanner = scanner();
        let before = scanner.current();

        let handle = scanner.start().unwrap();
        handle.abort();
        let _ = handle.await;

        assert!(!scanner.is_scanning());
        assert_eq!(scanner.current(), before);
    }
}
