use crate::alerts::{generate_alerts, Alert};
use crate::assets::{generate_assets, Asset};
use crate::error::SimError;
use crate::faults::{generate_micro_faults, MicroFault};
use crate::telemetry::{
    generate_current_readings, generate_time_series, CurrentReadings, TimeSeries,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle over the random source.
///
/// Clones draw from the same stream. A seeded simulator is reproducible
/// only while a single task drives it.
#[derive(Clone)]
pub struct Simulator {
    rng: Arc<Mutex<StdRng>>,
}

impl Simulator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => {
                tracing::debug!(seed, "Seeded simulator");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        // A panic mid-draw leaves the RNG in a valid state.
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current_readings(&self) -> CurrentReadings {
        generate_current_readings(&mut *self.rng(), Utc::now())
    }

    pub fn time_series(&self, hours: u32, interval_minutes: u32) -> Result<TimeSeries, SimError> {
        generate_time_series(&mut *self.rng(), Utc::now(), hours, interval_minutes)
    }

    pub fn assets(&self) -> Vec<Asset> {
        generate_assets(&mut *self.rng(), Utc::now())
    }

    pub fn micro_faults(&self) -> Vec<MicroFault> {
        generate_micro_faults(&mut *self.rng(), Utc::now())
    }

    pub fn alerts(&self) -> Vec<Alert> {
        generate_alerts(Utc::now())
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(None)
    }
}
